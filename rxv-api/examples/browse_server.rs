//! List every playable path of a receiver's media server, optionally play one
//!
//! ```text
//! RXV_LOG_MODE=debug cargo run --example browse_server -- 10.0.0.2
//! cargo run --example browse_server -- http://10.0.0.2/YamahaRemoteControl/ctrl "Fancy Server>Radio>Stream 17"
//! ```

use rxv_api::{init_logging_from_env, Receiver, ReceiverConfig};
use std::env;
use std::process;

fn main() {
    if let Err(e) = init_logging_from_env() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut args = env::args().skip(1);
    let Some(address) = args.next() else {
        eprintln!("usage: browse_server <ip-or-ctrl-url> [name>path>to>play]");
        process::exit(2);
    };

    let receiver = match Receiver::new(ReceiverConfig::new(address)) {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            process::exit(1);
        }
    };
    println!("Connected to {}", receiver);

    if let Some(path) = args.next() {
        match receiver.server_select(path.as_str()) {
            Ok(()) => println!("Playing {}", path),
            Err(e) => eprintln!("Failed to select {}: {}", path, e),
        }
        return;
    }

    match receiver.server_paths() {
        Ok(paths) => {
            for path in paths {
                println!("{:<12} {}", path.indices, path.names);
            }
        }
        Err(e) => {
            eprintln!("Failed to walk server menu: {}", e);
            process::exit(1);
        }
    }
}
