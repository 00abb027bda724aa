//! Command-line remote for a Sony networked receiver
//!
//! Usage: `remote <host> <command> [arg]`

use sony_avr::AvrClient;
use std::env;

fn usage() -> ! {
    eprintln!("usage: remote <host> <command> [arg]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  on | off          power control");
    eprintln!("  up | down         volume stepping");
    eprintln!("  volume <level>    absolute volume");
    eprintln!("  mute | unmute     mute control");
    eprintln!("  input <name>      select an input (e.g. \"audio in\")");
    eprintln!("  status            power, volume and input summary");
    eprintln!("  sources           list the sources the device reports");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let (Some(host), Some(command)) = (args.next(), args.next()) else {
        usage();
    };

    let avr = AvrClient::new(host)?;

    match command.as_str() {
        "on" => avr.turn_on().await?,
        "off" => avr.turn_off().await?,
        "up" => avr.raise_volume().await?,
        "down" => avr.lower_volume().await?,
        "mute" => avr.mute().await?,
        "unmute" => avr.unmute().await?,
        "volume" => {
            let level = args.next().ok_or("volume requires a level")?.parse()?;
            avr.set_volume(level).await?;
        }
        "input" => {
            let name = args.next().ok_or("input requires a name")?;
            avr.set_input_named(&name).await?;
        }
        "status" => {
            let power = avr.power_status().await?;
            println!("power: {power:?}");
            if power.is_on() {
                let info = avr.volume_info().await?;
                println!(
                    "volume: {}/{} (muted: {})",
                    info.volume,
                    info.max_volume,
                    info.is_muted()
                );
                if let Some(input) = avr.current_input().await? {
                    println!("input: {input}");
                }
            }
        }
        "sources" => {
            for source in avr.all_sources().await? {
                println!("{}\t{}", source.title, source.source);
            }
        }
        _ => usage(),
    }

    Ok(())
}
