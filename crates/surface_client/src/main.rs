//! surface: interactive real-time remote control for device parameters on
//! an audio host. Discovery and one-shot commands go over TCP; the
//! continuous value stream goes over fire-and-forget UDP.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use surface_client::ClientConfig;
use surface_client::command::CommandChannel;
use surface_client::keys;
use surface_client::scheduler::{RANDOM_WALK_PERIOD, SINE_PERIOD, Scheduler, StopReason};
use surface_client::session::ControlSession;
use surface_core::ControlError;
use surface_core::modulation::{Keyboard, RandomWalk, Sine};

/// Real-time remote control for device parameters on an audio host
#[derive(Parser)]
#[command(name = "surface")]
#[command(version)]
struct Cli {
    /// Track holding the target device
    track: usize,

    /// Device position on the track
    device: usize,

    /// Parameter indices to control (validated against the enabled set)
    #[arg(required = true)]
    params: Vec<usize>,

    /// Command channel endpoint (TCP)
    #[arg(long, default_value = "localhost:9877")]
    command_addr: String,

    /// Update channel endpoint (UDP)
    #[arg(long, default_value = "localhost:9878")]
    update_addr: String,

    /// Idle read timeout for command calls, in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Fixed seed for the random-walk demo (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = ClientConfig {
        command_addr: cli.command_addr.clone(),
        update_addr: cli.update_addr.clone(),
        read_timeout: Duration::from_secs(cli.timeout_secs),
    };
    let channel = CommandChannel::new(config.command_addr.clone(), config.read_timeout);

    let mut session =
        ControlSession::establish(&config, &channel, cli.track, cli.device, &cli.params)
            .context("failed to establish control session")?;

    println!(
        "Controlling {} on {} ({} parameters)",
        session.device().name,
        session.device().track_name,
        session.active_indices().len()
    );
    print_parameters(&session);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("failed to install interrupt handler")?;
    }

    print_help();
    prompt_loop(&config, &channel, &mut session, &cli, &stop)
}

fn prompt_loop(
    config: &ClientConfig,
    channel: &CommandChannel,
    session: &mut ControlSession,
    cli: &Cli,
    stop: &Arc<AtomicBool>,
) -> Result<()> {
    let stdin = io::stdin();
    loop {
        // A Ctrl-C that landed while no loop was running ends the program.
        if stop.swap(false, Ordering::SeqCst) {
            break;
        }
        print!("rt> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            continue;
        };

        let outcome = match name {
            "quit" => break,
            "keyboard" => run_keyboard(session, stop),
            "sine" => run_sine(session, args, stop),
            "random" => run_random(session, args, cli.seed, stop),
            "set" => run_set(session, args),
            "reset" => session.reset().map_err(Into::into).map(|()| {
                println!("Reset {} parameters to 0.5", session.active_indices().len());
            }),
            "list" => {
                print_parameters(session);
                Ok(())
            }
            "tracks" => show_tracks(channel),
            "devices" => show_devices(channel, args),
            "refresh" => match ControlSession::establish(
                config,
                channel,
                cli.track,
                cli.device,
                &cli.params,
            ) {
                Ok(fresh) => {
                    *session = fresh;
                    print_parameters(session);
                    Ok(())
                }
                Err(err) => Err(err.into()),
            },
            "status" => {
                show_status(session);
                Ok(())
            }
            "help" => {
                print_help();
                Ok(())
            }
            _ => {
                println!("Unknown command (try 'help')");
                Ok(())
            }
        };

        // Errors end the command, never the prompt.
        if let Err(err) = outcome {
            println!("Error: {err}");
        }
    }
    println!("Bye");
    Ok(())
}

fn run_keyboard(session: &mut ControlSession, stop: &Arc<AtomicBool>) -> Result<()> {
    println!("Keyboard control: q..t lower / a..g raise slots 0..4, space recenters, Esc exits");
    let poller = keys::detect()?;
    let (events, handle) = keys::spawn_capture(poller, stop.clone());

    let mut source = Keyboard::new(session.active_indices().to_vec());
    let scheduler = Scheduler::new(SINE_PERIOD, None, stop.clone());
    let reason = scheduler.run_keyed(session, &mut source, &events)?;

    drop(events);
    let _ = handle.join();
    finish_run(session, reason, stop);
    Ok(())
}

fn run_sine(session: &mut ControlSession, args: &[&str], stop: &Arc<AtomicBool>) -> Result<()> {
    let duration = parse_seconds(args.first(), 10.0)?;
    let frequency = parse_float(args.get(1), 0.5, "frequency")?;
    println!("Sine demo: {}s at {} Hz (Ctrl-C stops)", duration.as_secs_f64(), frequency);

    let mut source = Sine::new(session.active_indices().to_vec(), frequency);
    let scheduler = Scheduler::new(SINE_PERIOD, Some(duration), stop.clone());
    let reason = scheduler.run(session, &mut source)?;
    finish_run(session, reason, stop);
    Ok(())
}

fn run_random(
    session: &mut ControlSession,
    args: &[&str],
    seed: Option<u64>,
    stop: &Arc<AtomicBool>,
) -> Result<()> {
    let duration = parse_seconds(args.first(), 10.0)?;
    println!("Random walk: {}s (Ctrl-C stops)", duration.as_secs_f64());

    let indices = session.active_indices().to_vec();
    let mut source = match seed {
        Some(seed) => RandomWalk::with_seed(indices, RandomWalk::DEFAULT_STEP, seed),
        None => RandomWalk::new(indices, RandomWalk::DEFAULT_STEP),
    };
    let scheduler = Scheduler::new(RANDOM_WALK_PERIOD, Some(duration), stop.clone());
    let reason = scheduler.run(session, &mut source)?;
    finish_run(session, reason, stop);
    Ok(())
}

fn run_set(session: &mut ControlSession, args: &[&str]) -> Result<()> {
    let (slot, value) = match args {
        [slot, value] => (
            slot.parse::<usize>().context("slot must be an integer")?,
            value.parse::<f64>().context("value must be a number")?,
        ),
        _ => {
            println!("Usage: set <slot> <value>");
            return Ok(());
        }
    };
    session.set_slot(slot, value)?;
    println!("Set slot {slot} to {value}");
    Ok(())
}

fn show_tracks(channel: &CommandChannel) -> Result<()> {
    let overview = channel.session_info()?;
    println!("Tempo: {} BPM", overview.tempo);
    for (i, track) in overview.tracks.iter().enumerate() {
        println!("[{i:2}] {:20} ({} devices)", track.name, track.device_count);
    }
    Ok(())
}

fn show_devices(channel: &CommandChannel, args: &[&str]) -> Result<()> {
    let Some(track) = args.first() else {
        println!("Usage: devices <track>");
        return Ok(());
    };
    let track = track.parse::<usize>().context("track must be an integer")?;
    let overview = channel.track_info(track)?;
    println!("Track: {}", overview.name);
    for (i, device) in overview.devices.iter().enumerate() {
        println!("[{i:2}] {}", device.name);
    }
    Ok(())
}

fn show_status(session: &ControlSession) {
    println!("Active indices: {:?}", session.active_indices());
    for (index, value) in session.last_values() {
        println!("  [{index:2}] {value:.3}");
    }
    println!("Datagrams sent: {}", session.datagrams_sent());
}

fn finish_run(session: &ControlSession, reason: StopReason, stop: &Arc<AtomicBool>) {
    // Consume the interrupt so the prompt survives it.
    stop.store(false, Ordering::SeqCst);
    match reason {
        StopReason::DurationElapsed => println!("Done"),
        StopReason::Interrupted => println!("Stopped"),
        StopReason::ExitRequested => println!("Left keyboard mode"),
    }
    for (index, value) in session.last_values() {
        println!("  [{index:2}] {value:.3}");
    }
}

fn print_parameters(session: &ControlSession) {
    let device = session.device();
    println!(
        "{:<4} {:<25} {:<10} {:<6} {:<15} {}",
        "Idx", "Name", "Value", "Norm", "Range", "On"
    );
    for param in &device.parameters {
        let marker = if session.active_indices().contains(&param.index) {
            "*"
        } else {
            " "
        };
        println!(
            "{:<4} {:<25} {:<10.3} {:<6.3} {:<15} {}{}",
            param.index,
            param.name,
            param.value,
            param.normalized_value,
            format!("{:.1}..{:.1}", param.min, param.max),
            if param.is_enabled { "y" } else { "n" },
            marker,
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  keyboard               - keyboard control mode");
    println!("  sine [duration] [freq] - sine wave demo");
    println!("  random [duration]      - random walk demo");
    println!("  set <slot> <value>     - set one parameter (0.0-1.0)");
    println!("  reset                  - all active parameters to 0.5");
    println!("  list                   - parameter table");
    println!("  tracks                 - session overview");
    println!("  devices <track>        - devices on a track");
    println!("  refresh                - re-run discovery");
    println!("  status                 - session status");
    println!("  quit                   - exit");
}

fn parse_seconds(arg: Option<&&str>, default: f64) -> Result<Duration> {
    let seconds = parse_float(arg, default, "duration")?;
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(ControlError::Validation(format!("duration {seconds} must be positive")).into());
    }
    Ok(Duration::from_secs_f64(seconds))
}

fn parse_float(arg: Option<&&str>, default: f64, what: &str) -> Result<f64> {
    match arg {
        Some(text) => text
            .parse::<f64>()
            .with_context(|| format!("{what} must be a number")),
        None => Ok(default),
    }
}
