use std::fs::File;
use std::io::{self, Read};
use std::{env, process};
use xzdec::XzReader;

fn check(path: &str) -> io::Result<u64> {
    let mut reader = XzReader::new(File::open(path)?);
    let mut buffer = vec![0u8; 0x10000];
    let mut total = 0u64;
    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            return Ok(total);
        }
        total += count as u64;
    }
}

fn main() {
    let args = env::args().collect::<Vec<String>>();
    if args.len() != 2 {
        eprintln!("xzcheck verifies that .xz files are valid and can be decoded with xzdec.");
        eprintln!("Usage: xzcheck <file>");
        process::exit(1);
    }

    match check(&args[1]) {
        Ok(total) => {
            eprintln!("{}: OK ({} bytes)", &args[1], total);
        }
        Err(err) => {
            eprintln!("{}: {}", &args[1], err);
            process::exit(1);
        }
    }
}
