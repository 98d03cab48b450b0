use txline::SimConfig;

/// 50 MHz, a common FPGA board reference clock.
const DEFAULT_CLOCK_HZ: u32 = 50_000_000;
const DEFAULT_BAUD: u32 = 115_200;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let message = args.next().unwrap_or_else(|| "Hello, UART!".to_string());

    let clock_hz = match args.next() {
        Some(raw) => match raw.replace('_', "").parse::<u32>() {
            Ok(hz) => hz,
            Err(_) => {
                eprintln!(
                    "Invalid clock rate '{}'. Expected Hz, for example:\n\
                     txline \"hello\" 50000000 115200",
                    raw
                );
                std::process::exit(1);
            }
        },
        None => DEFAULT_CLOCK_HZ,
    };

    let baud = match args.next() {
        Some(raw) => match txline::parse_baud(&raw) {
            Ok(rate) => rate,
            Err(err) => {
                eprintln!("{:#}. Expected a rate like 9600, or a preset (midi, dmx)", err);
                std::process::exit(1);
            }
        },
        None => DEFAULT_BAUD,
    };

    log::info!(
        "Simulating {} byte(s) at {} baud on a {} Hz clock",
        message.len(),
        baud,
        clock_hz
    );

    let config = SimConfig::builder()
        .clock_hz(clock_hz)
        .baud(baud)
        .payload(message.into_bytes())
        .build();

    txline::run(config).unwrap();
}
