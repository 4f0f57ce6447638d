use crate::{
    framing::LineFramer,
    notify::{Notify, SensorEvent},
    port::{ReadStatus, SensorPort, SensorReader},
    protocol::SensorMessage,
};
use std::{
    thread::{self, JoinHandle},
    time::Duration,
};
use undulate_engine::{SharedControlValue, StopHandle};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Updates `control_value` from a single line of sensor output.
pub fn process_line<N: Notify + ?Sized>(
    line: &str,
    control_value: &SharedControlValue,
    notify: &mut N,
) {
    notify.notify(SensorEvent::Received(line.to_string()));
    match SensorMessage::parse(line) {
        Some(SensorMessage::ControlValue(value)) => {
            control_value.set(value);
            notify.notify(SensorEvent::ControlValueUpdated(value));
        }
        Some(SensorMessage::Ready) => notify.notify(SensorEvent::DeviceReady),
        None => (),
    }
}

/// Reads from `reader` until the stream closes, a read fails, or `stop` is
/// requested. The control value is left as it was when reading ends.
pub fn read_loop<R: SensorReader, N: Notify + ?Sized>(
    reader: &mut R,
    control_value: &SharedControlValue,
    notify: &mut N,
    stop: &StopHandle,
    poll_interval: Duration,
) {
    let mut framer = LineFramer::new();
    let mut buf = Vec::new();
    while !stop.is_stopped() {
        buf.clear();
        match reader.read_available(&mut buf) {
            Ok(ReadStatus::Data) => {
                framer.push(&buf);
                while let Some(line) = framer.next_line() {
                    process_line(&line, control_value, notify);
                }
            }
            Ok(ReadStatus::Pending) => thread::sleep(poll_interval),
            Ok(ReadStatus::Closed) => {
                if let Some(line) = framer.finish() {
                    process_line(&line, control_value, notify);
                }
                notify.notify(SensorEvent::Closed);
                return;
            }
            Err(e) => {
                notify.notify(SensorEvent::ReadFailed(e.to_string()));
                return;
            }
        }
    }
    log::info!("Sensor reader stopped");
}

/// A background thread feeding control values from a sensor into a shared
/// mailbox. Dropping the task stops the thread and waits for it to finish.
pub struct SensorTask {
    stop: StopHandle,
    join_handle: Option<JoinHandle<()>>,
}

impl SensorTask {
    /// Opens `port` on a new thread and starts reading from it.
    pub fn spawn<P, N>(
        port: P,
        control_value: SharedControlValue,
        mut notify: N,
        poll_interval: Duration,
    ) -> anyhow::Result<Self>
    where
        P: SensorPort + Send + 'static,
        N: Notify,
    {
        let stop = StopHandle::new();
        let join_handle = thread::Builder::new()
            .name("undulate-sensor".to_string())
            .spawn({
                let stop = stop.clone();
                move || {
                    let description = port.describe();
                    let mut reader = match port.open() {
                        Ok(reader) => reader,
                        Err(e) => {
                            notify.notify(SensorEvent::OpenFailed(format!(
                                "{}: {}",
                                description, e
                            )));
                            return;
                        }
                    };
                    notify.notify(SensorEvent::Opened(description));
                    read_loop(
                        &mut reader,
                        &control_value,
                        &mut notify,
                        &stop,
                        poll_interval,
                    );
                }
            })?;
        Ok(Self {
            stop,
            join_handle: Some(join_handle),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(|join_handle| join_handle.is_finished())
    }

    /// Stops the reader and waits for its thread to exit.
    pub fn stop(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        self.stop.stop();
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                log::error!("Sensor reader thread panicked");
            }
        }
    }
}

impl Drop for SensorTask {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{collections::VecDeque, sync::mpsc};
    use undulate_engine::ControlValue;

    type Step = anyhow::Result<Option<&'static [u8]>>;

    fn data(bytes: &'static [u8]) -> Step {
        Ok(Some(bytes))
    }

    fn pending() -> Step {
        Ok(None)
    }

    fn fail(message: &'static str) -> Step {
        Err(anyhow::anyhow!(message))
    }

    /// Delivers a fixed sequence of read results, then closes.
    struct ScriptedReader(VecDeque<Step>);

    impl ScriptedReader {
        fn new(steps: Vec<Step>) -> Self {
            Self(steps.into())
        }
    }

    impl SensorReader for ScriptedReader {
        fn read_available(
            &mut self,
            buf: &mut Vec<u8>,
        ) -> anyhow::Result<ReadStatus> {
            match self.0.pop_front() {
                None => Ok(ReadStatus::Closed),
                Some(Ok(None)) => Ok(ReadStatus::Pending),
                Some(Ok(Some(bytes))) => {
                    buf.extend_from_slice(bytes);
                    Ok(ReadStatus::Data)
                }
                Some(Err(e)) => Err(e),
            }
        }
    }

    struct ScriptedPort(Option<ScriptedReader>);

    impl SensorPort for ScriptedPort {
        type Reader = ScriptedReader;

        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn open(self) -> anyhow::Result<ScriptedReader> {
            self.0.ok_or_else(|| anyhow::anyhow!("permission denied"))
        }
    }

    fn run(steps: Vec<Step>) -> (SharedControlValue, Vec<SensorEvent>) {
        let control_value = SharedControlValue::default();
        let (mut sender, receiver) = mpsc::channel::<SensorEvent>();
        read_loop(
            &mut ScriptedReader::new(steps),
            &control_value,
            &mut sender,
            &StopHandle::new(),
            Duration::ZERO,
        );
        drop(sender);
        (control_value, receiver.iter().collect())
    }

    fn cv(value: u8) -> ControlValue {
        ControlValue::new(value).unwrap()
    }

    #[test]
    fn protocol_lines_update_control_value() {
        let cases: [(&'static [u8], u8); 4] = [
            (b"POT:57\n", 57),
            (b"POT:150\n", 50),
            (b"garbage\n", 50),
            (b"READY:POTENTIOMETER\n", 50),
        ];
        for (input, expected) in cases {
            let (control_value, _) = run(vec![data(input)]);
            assert_eq!(control_value.get(), cv(expected));
        }
    }

    #[test]
    fn split_chunks_and_events() {
        let (control_value, events) = run(vec![
            data(b"READY:POTENTIOMETER\r\nPO"),
            pending(),
            data(b"T:9"),
            data(b"\nPOT:101\nPOT:33"),
        ]);
        // the trailing partial line is used when the stream closes
        assert_eq!(control_value.get(), cv(33));
        assert_eq!(
            events,
            vec![
                SensorEvent::Received("READY:POTENTIOMETER".to_string()),
                SensorEvent::DeviceReady,
                SensorEvent::Received("POT:9".to_string()),
                SensorEvent::ControlValueUpdated(cv(9)),
                SensorEvent::Received("POT:101".to_string()),
                SensorEvent::Received("POT:33".to_string()),
                SensorEvent::ControlValueUpdated(cv(33)),
                SensorEvent::Closed,
            ]
        );
    }

    #[test]
    fn read_failure_keeps_last_value() {
        let (control_value, events) = run(vec![
            data(b"POT:80\n"),
            fail("device unplugged"),
            data(b"POT:10\n"),
        ]);
        assert_eq!(control_value.get(), cv(80));
        assert_eq!(
            events.last(),
            Some(&SensorEvent::ReadFailed("device unplugged".to_string()))
        );
    }

    #[test]
    fn stopped_loop_reads_nothing() {
        let control_value = SharedControlValue::default();
        let stop = StopHandle::new();
        stop.stop();
        let (mut sender, receiver) = mpsc::channel::<SensorEvent>();
        read_loop(
            &mut ScriptedReader::new(vec![data(b"POT:1\n")]),
            &control_value,
            &mut sender,
            &stop,
            Duration::ZERO,
        );
        assert_eq!(control_value.get(), cv(50));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn task_reads_until_closed() {
        let control_value = SharedControlValue::default();
        let (sender, receiver) = mpsc::channel::<SensorEvent>();
        let port = ScriptedPort(Some(ScriptedReader::new(vec![
            data(b"POT:12\n"),
            pending(),
            data(b"POT:21\n"),
        ])));
        let task = SensorTask::spawn(
            port,
            control_value.clone(),
            sender,
            Duration::ZERO,
        )
        .unwrap();
        let events = receiver.iter().collect::<Vec<_>>();
        assert_eq!(
            events.first(),
            Some(&SensorEvent::Opened("scripted".to_string()))
        );
        assert_eq!(events.last(), Some(&SensorEvent::Closed));
        task.stop();
        assert_eq!(control_value.get(), cv(21));
    }

    #[test]
    fn open_failure_is_reported() {
        let control_value = SharedControlValue::new(cv(64));
        let (sender, receiver) = mpsc::channel::<SensorEvent>();
        let task = SensorTask::spawn(
            ScriptedPort(None),
            control_value.clone(),
            sender,
            Duration::ZERO,
        )
        .unwrap();
        let events = receiver.iter().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![SensorEvent::OpenFailed(
                "scripted: permission denied".to_string()
            )]
        );
        task.stop();
        assert_eq!(control_value.get(), cv(64));
    }

    #[test]
    fn dropping_task_stops_endless_reader() {
        struct Silent;

        impl SensorReader for Silent {
            fn read_available(
                &mut self,
                _buf: &mut Vec<u8>,
            ) -> anyhow::Result<ReadStatus> {
                Ok(ReadStatus::Pending)
            }
        }

        struct SilentPort;

        impl SensorPort for SilentPort {
            type Reader = Silent;

            fn describe(&self) -> String {
                "silent".to_string()
            }

            fn open(self) -> anyhow::Result<Silent> {
                Ok(Silent)
            }
        }

        let (sender, receiver) = mpsc::channel::<SensorEvent>();
        let task = SensorTask::spawn(
            SilentPort,
            SharedControlValue::default(),
            sender,
            Duration::from_millis(1),
        )
        .unwrap();
        assert!(!task.is_finished());
        drop(task);
        let events = receiver.iter().collect::<Vec<_>>();
        assert_eq!(events, vec![SensorEvent::Opened("silent".to_string())]);
    }
}
