//! A minimal command shell on the console, mostly there to play with timers.
use crate::{
    arch,
    time::{
        Instant,
        events::{self, KernelScheduler, Message},
    },
};
use core::{fmt, time::Duration};

/// A line typed in the shell.
type Line = heapless::String<{ config::SHELL_LINE_LENGTH }>;

const HELP: &str = "\
help                          print this help
uptime                        print the time elapsed since boot
setTimeout <MESSAGE> <SECS>   print MESSAGE after SECS seconds
twoSec                        print the uptime every two seconds";

/// Errors reported to the user of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    /// The command is not known by the shell.
    UnknownCommand,

    /// A required argument of the command was not given.
    MissingArgument(&'static str),

    /// The number of seconds is not a valid unsigned integer.
    InvalidSeconds,

    /// The line is longer than `config::SHELL_LINE_LENGTH`.
    LineTooLong,
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::UnknownCommand => {
                write!(f, "Unknown command, type `help` for the list of commands")
            }
            ShellError::MissingArgument(name) => write!(f, "Missing argument: {name}"),
            ShellError::InvalidSeconds => {
                write!(f, "The number of seconds must be an unsigned integer")
            }
            ShellError::LineTooLong => write!(
                f,
                "Line too long, at most {} bytes are allowed",
                config::SHELL_LINE_LENGTH
            ),
        }
    }
}

/// A command parsed from a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command<'a> {
    Help,
    Uptime,
    SetTimeout { message: &'a str, seconds: u64 },
    TwoSec,
}

impl<'a> Command<'a> {
    /// Parse a line. Blank lines yield `None`.
    fn parse(line: &'a str) -> Result<Option<Self>, ShellError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name {
            "help" => Command::Help,
            "uptime" => Command::Uptime,
            "twoSec" => Command::TwoSec,
            "setTimeout" => {
                let message = words
                    .next()
                    .ok_or(ShellError::MissingArgument("MESSAGE"))?;
                let seconds = words
                    .next()
                    .ok_or(ShellError::MissingArgument("SECS"))?
                    .parse()
                    .map_err(|_| ShellError::InvalidSeconds)?;
                Command::SetTimeout { message, seconds }
            }
            _ => return Err(ShellError::UnknownCommand),
        };

        Ok(Some(command))
    }
}

/// Run the shell forever.
pub fn run() -> ! {
    println!("Welcome! Type `help` for the list of commands.");

    let mut line = Line::new();
    loop {
        print!("# ");
        if let Err(error) = read_line(&mut line).and_then(|()| execute(&line)) {
            println!("{error}");
        }
        line.clear();
    }
}

/// Read a line from the console into `line`, echoing it. The whole line is
/// consumed even if it does not fit in the buffer.
fn read_line(line: &mut Line) -> Result<(), ShellError> {
    let mut overflow = false;

    loop {
        match arch::console::read_byte() {
            b'\n' => {
                println!();
                break;
            }
            0x08 | 0x7F => {
                if line.pop().is_some() {
                    print!("\x08 \x08");
                }
            }
            byte if byte.is_ascii_graphic() || byte == b' ' => {
                if line.push(char::from(byte)).is_ok() {
                    print!("{}", char::from(byte));
                } else {
                    overflow = true;
                }
            }
            _ => {}
        }
    }

    if overflow {
        Err(ShellError::LineTooLong)
    } else {
        Ok(())
    }
}

fn execute(line: &str) -> Result<(), ShellError> {
    match Command::parse(line)? {
        None => {}
        Some(Command::Help) => println!("{HELP}"),
        Some(Command::Uptime) => {
            let now = Instant::now();
            println!("{} since boot ({} ticks)", now, now.ticks());
        }
        Some(Command::SetTimeout { message, seconds }) => {
            let expire = Instant::now() + Duration::from_secs(seconds);

            // Timer callbacks free their message from the interrupt handler,
            // so the heap must not be used with interrupts enabled here.
            let message = arch::irq::without(|| Message::from(message));
            events::add_timer(print_message, message, expire);
        }
        Some(Command::TwoSec) => {
            let interval = Duration::from_secs(config::PERIODIC_INTERVAL_SECS);
            let label = arch::irq::without(|| Message::from("twoSec"));
            events::add_timer(print_uptime, label, Instant::now() + interval);
        }
    }

    Ok(())
}

/// The callback of `setTimeout`: print the message.
fn print_message(_: &KernelScheduler, message: Message) {
    println!("\n[{}] {}", Instant::now(), message);
}

/// The callback of `twoSec`: print the uptime after the label and reschedule
/// itself with the same label.
fn print_uptime(scheduler: &KernelScheduler, label: Message) {
    let now = Instant::now();
    println!("\n[{}] {}: {} ticks since boot", now, label, now.ticks());

    let next = now + Duration::from_secs(config::PERIODIC_INTERVAL_SECS);
    scheduler.add_timer(print_uptime, label, next.ticks());
}
