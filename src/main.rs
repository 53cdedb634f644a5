use std::env;

use log::info;

use gridlock::game::{generate_queens, generate_tango, solve, GenerateOptions, SolveOptions};

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn main() {
    env_logger::init();

    let queens_size = env_usize("GRIDLOCK_QUEENS_SIZE", 8);
    let tango_size = env_usize("GRIDLOCK_TANGO_SIZE", 6);
    let options = GenerateOptions {
        seed: env::var("GRIDLOCK_SEED")
            .ok()
            .and_then(|value| value.parse().ok()),
        ..Default::default()
    };

    match generate_queens(queens_size, &options) {
        Ok(board) => {
            info!("generated a {0}x{0} exclusivity puzzle", queens_size);
            println!("puzzle:{:?}", board);
            println!(
                "layout: {}",
                serde_json::to_string(&board.layout).expect("layout serializes")
            );
            match solve(&board, &SolveOptions::default()) {
                Ok(solved) => println!("solved:{:?}", solved),
                Err(err) => eprintln!("solve failed: {}", err),
            }
        }
        Err(err) => eprintln!("queens generation failed: {}", err),
    }

    match generate_tango(tango_size, &options) {
        Ok(board) => {
            info!("generated a {0}x{0} balance puzzle", tango_size);
            println!("puzzle:{:?}", board);
            println!(
                "layout: {}",
                serde_json::to_string(&board.layout).expect("layout serializes")
            );
            match solve(&board, &SolveOptions::default()) {
                Ok(solved) => println!("solved:{:?}", solved),
                Err(err) => eprintln!("solve failed: {}", err),
            }
        }
        Err(err) => eprintln!("tango generation failed: {}", err),
    }
}
