//! Spin the default machine once without a window and log what landed.
//!
//! Pass a directory containing `zero.png` .. `nine.png` to size the symbols
//! from real images:
//!
//! ```bash
//! RUST_LOG=info cargo run --example headless_spin -- assets/
//! ```

use std::path::PathBuf;

use reelspin::prelude::*;

fn main() -> reelspin::Result<()> {
    let config = MachineConfig::default();

    let mut machine = match std::env::args().nth(1).map(PathBuf::from) {
        Some(dir) => {
            let atlas = ImageAtlas::load_from(&dir, &config.symbols)?;
            SlotMachine::new(config, &atlas, 1280.0, 720.0)?
        }
        None => {
            let atlas = UniformAtlas::new(config.symbols.len(), (150, 150));
            SlotMachine::new(config, &atlas, 1280.0, 720.0)?
        }
    };

    machine.controller_mut().subscribe(|event| match event {
        SpinEvent::SpinStarted => println!("spin!"),
        SpinEvent::ReelStopped { reel, symbol } => {
            println!("reel {} stopped on {:?}", reel, symbol)
        }
        SpinEvent::SpinFinished(_) => println!("all reels stopped"),
    });

    if let Some(outcome) = machine.spin_and_wait() {
        println!(
            "{} {:?}",
            if outcome.is_win() { "WIN" } else { "no win" },
            outcome.landed
        );
    }
    Ok(())
}
