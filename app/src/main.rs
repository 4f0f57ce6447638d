mod display;
mod status;

use clap::{Parser, Subcommand};
use display::SdlDisplay;
use rand::{SeedableRng, rngs::StdRng};
use status::{Connection, SensorStatus};
use std::{path::PathBuf, sync::mpsc, time::Duration};
use undulate_engine::{
    ControlValue, EngineConfig, FrameCompositor, RenderLoop,
    SharedControlValue,
};
use undulate_sensor::{
    DEFAULT_BAUD_RATE, DEFAULT_POLL_INTERVAL, LogNotify, ReplayPort,
    SensorEvent, SensorPort, SensorTask, SerialPort, Tee, UdpPort,
};

#[derive(Parser, Debug)]
#[command(name = "undulate")]
#[command(about = "Animated wave lines whose height follows a sensor")]
struct Cli {
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Control value (0 to 100) used until the sensor reports one.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    initial_control_value: u8,
    /// Seed for the randomized wave parameters. A random seed is used if
    /// this is omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file with engine settings.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    time_step: Option<f64>,
    #[arg(long)]
    blend_retain: Option<f64>,
    #[arg(long)]
    extension_factor: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_interval_ms: u64,
    #[command(subcommand)]
    sensor: Option<Sensor>,
}

#[derive(Debug, Subcommand)]
enum Sensor {
    /// Read from a device attached to a serial port.
    Serial {
        #[arg(short, long)]
        tty: PathBuf,
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baud: u32,
    },
    /// Listen for datagrams on a udp socket.
    Udp {
        #[arg(short, long)]
        addr: String,
    },
    /// Replay a file of recorded sensor output.
    Replay {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        let mut config = self
            .config
            .as_ref()
            .map(EngineConfig::load_)
            .unwrap_or_default();
        if let Some(time_step) = self.time_step {
            config.time_step = time_step;
        }
        if let Some(blend_retain) = self.blend_retain {
            config.blend_retain = blend_retain;
        }
        if let Some(extension_factor) = self.extension_factor {
            config.extension_factor = extension_factor;
        }
        config.clamped()
    }
}

fn spawn_sensor<P: SensorPort + Send + 'static>(
    port: P,
    control_value: &SharedControlValue,
    poll_interval: Duration,
) -> anyhow::Result<(SensorTask, mpsc::Receiver<SensorEvent>)> {
    let (sender, receiver) = mpsc::channel();
    let task = SensorTask::spawn(
        port,
        control_value.clone(),
        Tee(LogNotify, sender),
        poll_interval,
    )?;
    Ok((task, receiver))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let initial_control_value = ControlValue::new(cli.initial_control_value)
        .ok_or_else(|| anyhow::anyhow!("control value out of range"))?;
    let control_value = SharedControlValue::new(initial_control_value);
    let poll_interval = Duration::from_millis(cli.poll_interval_ms);
    let sensor = match cli.sensor.as_ref() {
        None => {
            log::info!("No sensor configured");
            None
        }
        Some(Sensor::Serial { tty, baud }) => Some(spawn_sensor(
            SerialPort::new(tty, *baud),
            &control_value,
            poll_interval,
        )?),
        Some(Sensor::Udp { addr }) => Some(spawn_sensor(
            UdpPort::new(addr.as_str())?,
            &control_value,
            poll_interval,
        )?),
        Some(Sensor::Replay { file, interval_ms }) => Some(spawn_sensor(
            ReplayPort::new(file, Duration::from_millis(*interval_ms)),
            &control_value,
            poll_interval,
        )?),
    };
    let (sensor_task, sensor_events) = sensor.unzip();
    let connection = if sensor_events.is_some() {
        Connection::Connecting
    } else {
        Connection::None
    };
    let mut display = SdlDisplay::new(
        cli.width,
        cli.height,
        SensorStatus::new(connection, initial_control_value),
        sensor_events,
    )?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let config = cli.engine_config();
    log::info!("Engine config: {:?}", config);
    let compositor = FrameCompositor::with_default_lines(config, &mut rng);
    let mut render_loop = RenderLoop::new(compositor, control_value);
    let result = render_loop.run(&mut display);
    if let Some(sensor_task) = sensor_task {
        sensor_task.stop();
    }
    result
}
