use std::f64::consts::PI;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::drivers::lsm303::Accelerometer;
use crate::drivers::params::AcquisitionSettings;
use crate::drivers::ScopeError;
use crate::types::Sample;

const HARDWARE_IDLE: Duration = Duration::from_millis(1);
const PHASE_STEP: f64 = 2.0 * PI / 1920.0;
const PHASES: [f64; 3] = [0.0, 2.0 * PI / 3.0, -2.0 * PI / 3.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Hardware,
    Synthetic,
}

/// Something the sampler thread can pull one sample per tick from.
pub trait SampleSource {
    fn kind(&self) -> SourceKind;
    fn settings(&self) -> AcquisitionSettings;
    fn next_sample(&mut self) -> Result<Sample, ScopeError>;
    /// Reconfigure from already-validated settings.
    fn configure(&mut self, settings: AcquisitionSettings) -> Result<(), ScopeError>;
    /// How long to wait between ticks when no command is pending.
    fn idle_delay(&self) -> Duration;
}

/// Physical sensor; the tables map one-to-one onto register values.
pub struct HardwareSource<A: Accelerometer> {
    sensor: A,
    settings: AcquisitionSettings,
}

impl<A: Accelerometer> SampleSource for HardwareSource<A> {
    fn kind(&self) -> SourceKind {
        SourceKind::Hardware
    }

    fn settings(&self) -> AcquisitionSettings {
        self.settings
    }

    fn next_sample(&mut self) -> Result<Sample, ScopeError> {
        Ok(self.sensor.read()?.into())
    }

    fn configure(&mut self, settings: AcquisitionSettings) -> Result<(), ScopeError> {
        if settings.rate != self.settings.rate {
            self.sensor.set_rate(settings.rate)?;
        }
        if settings.range != self.settings.range {
            self.sensor.set_range(settings.range)?;
        }
        if settings.mode != self.settings.mode {
            self.sensor.set_mode(settings.mode)?;
        }
        self.settings = settings;
        Ok(())
    }

    fn idle_delay(&self) -> Duration {
        HARDWARE_IDLE
    }
}

/// Three sines 120° apart with uniform noise; no hardware needed.
pub struct SyntheticSource {
    settings: AcquisitionSettings,
    phase: f64,
    rng: StdRng,
}

impl SyntheticSource {
    pub fn new(settings: AcquisitionSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_rng(settings: AcquisitionSettings, rng: StdRng) -> Self {
        Self {
            settings,
            phase: 0.0,
            rng,
        }
    }
}

impl SampleSource for SyntheticSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Synthetic
    }

    fn settings(&self) -> AcquisitionSettings {
        self.settings
    }

    fn next_sample(&mut self) -> Result<Sample, ScopeError> {
        self.phase += PHASE_STEP;
        if self.phase > PI {
            self.phase -= 2.0 * PI;
        }
        let scale = self.settings.range.synthetic_scale();
        let noise = self.settings.mode.synthetic_noise();
        let mut channel = |offset: f64| {
            9.0 * scale * (self.phase + offset).sin()
                + (self.rng.gen::<f64>() - 0.5) * noise * scale
        };
        Ok(Sample(
            channel(PHASES[0]),
            channel(PHASES[1]),
            channel(PHASES[2]),
        ))
    }

    fn configure(&mut self, settings: AcquisitionSettings) -> Result<(), ScopeError> {
        self.settings = settings;
        Ok(())
    }

    fn idle_delay(&self) -> Duration {
        self.settings.rate.synthetic_period()
    }
}

/// Configure the sensor and take one reading so a dead device is caught here.
pub fn try_init_hardware<A: Accelerometer>(
    mut sensor: A,
    settings: AcquisitionSettings,
) -> Result<HardwareSource<A>, ScopeError> {
    sensor.set_rate(settings.rate)?;
    sensor.set_range(settings.range)?;
    sensor.set_mode(settings.mode)?;
    sensor.read()?;
    Ok(HardwareSource { sensor, settings })
}

pub type BoxedSensor = Box<dyn Accelerometer + Send>;

/// Open the accelerometer on the given i2c-dev node.
#[cfg(target_os = "linux")]
pub fn open_sensor(i2c_path: &str) -> Result<BoxedSensor, ScopeError> {
    use crate::drivers::lsm303::Lsm303;
    use linux_embedded_hal::I2cdev;

    let i2c = I2cdev::new(i2c_path)
        .map_err(|err| ScopeError::HardwareUnavailable(format!("{i2c_path}: {err}")))?;
    Ok(Box::new(Lsm303::new(i2c)?))
}

#[cfg(not(target_os = "linux"))]
pub fn open_sensor(i2c_path: &str) -> Result<BoxedSensor, ScopeError> {
    Err(ScopeError::HardwareUnavailable(format!(
        "{i2c_path}: i2c-dev is only supported on linux"
    )))
}

/// Prefer the hardware, fall back to the generator on any error.
pub fn select_source<A>(
    sensor: Result<A, ScopeError>,
    settings: AcquisitionSettings,
) -> Box<dyn SampleSource + Send>
where
    A: Accelerometer + Send + 'static,
{
    match sensor.and_then(|sensor| try_init_hardware(sensor, settings)) {
        Ok(source) => {
            log::info!("sampling from accelerometer");
            Box::new(source)
        }
        Err(err) => {
            log::warn!("accelerometer not available ({err}), using synthetic signal");
            Box::new(SyntheticSource::new(settings))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::drivers::params::{ControlCommand, Mode, Range, Rate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) enum SensorCall {
        Rate(Rate),
        Range(Range),
        Mode(Mode),
    }

    /// Scripted sensor: returns `reads` then fails. Counts every read attempt
    /// and logs every setter call.
    pub(crate) struct FakeSensor {
        pub reads: Vec<(f64, f64, f64)>,
        pub attempts: Arc<AtomicUsize>,
        pub calls: Arc<Mutex<Vec<SensorCall>>>,
    }

    impl FakeSensor {
        pub fn new(reads: Vec<(f64, f64, f64)>) -> Self {
            Self {
                reads,
                attempts: Arc::new(AtomicUsize::new(0)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn failing(attempts: Arc<AtomicUsize>) -> Self {
            Self {
                attempts,
                ..Self::new(Vec::new())
            }
        }

        fn record(&self, call: SensorCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl Accelerometer for FakeSensor {
        fn set_rate(&mut self, rate: Rate) -> Result<(), ScopeError> {
            self.record(SensorCall::Rate(rate));
            Ok(())
        }
        fn set_range(&mut self, range: Range) -> Result<(), ScopeError> {
            self.record(SensorCall::Range(range));
            Ok(())
        }
        fn set_mode(&mut self, mode: Mode) -> Result<(), ScopeError> {
            self.record(SensorCall::Mode(mode));
            Ok(())
        }
        fn read(&mut self) -> Result<(f64, f64, f64), ScopeError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.reads.is_empty() {
                Err(ScopeError::HardwareUnavailable("sensor gone".into()))
            } else {
                Ok(self.reads.remove(0))
            }
        }
    }

    #[test]
    fn failing_first_read_falls_back_to_synthetic() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let sensor = FakeSensor::failing(attempts.clone());
        let mut source = select_source(Ok(sensor), AcquisitionSettings::default());
        assert_eq!(source.kind(), SourceKind::Synthetic);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        for _ in 0..10 {
            source.next_sample().unwrap();
        }
        // the hardware handle is gone; nothing touched it again
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn open_error_falls_back_to_synthetic() {
        let sensor: Result<FakeSensor, _> =
            Err(ScopeError::HardwareUnavailable("no bus".into()));
        let source = select_source(sensor, AcquisitionSettings::default());
        assert_eq!(source.kind(), SourceKind::Synthetic);
    }

    #[test]
    fn init_configures_every_field_once() {
        let sensor = FakeSensor::new(vec![(0.0, 0.0, 9.8)]);
        let calls = sensor.calls.clone();
        try_init_hardware(sensor, AcquisitionSettings::default()).unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                SensorCall::Rate(Rate::Hz1620),
                SensorCall::Range(Range::G16),
                SensorCall::Mode(Mode::Normal),
            ]
        );
    }

    #[test]
    fn boxed_sensor_is_a_sensor() {
        let sensor: BoxedSensor =
            Box::new(FakeSensor::new(vec![(0.0, 0.0, 9.8), (4.0, 5.0, 6.0)]));
        let mut source = select_source(Ok(sensor), AcquisitionSettings::default());
        assert_eq!(source.kind(), SourceKind::Hardware);
        assert_eq!(source.next_sample().unwrap(), Sample(4.0, 5.0, 6.0));
    }

    #[test]
    fn working_sensor_is_used() {
        let sensor = FakeSensor::new(vec![(0.0, 0.0, 9.8), (1.0, 2.0, 3.0)]);
        let mut source = select_source(Ok(sensor), AcquisitionSettings::default());
        assert_eq!(source.kind(), SourceKind::Hardware);
        assert_eq!(source.next_sample().unwrap(), Sample(1.0, 2.0, 3.0));
    }

    #[test]
    fn synthetic_channels_are_phase_shifted_sines() {
        let settings = AcquisitionSettings::from_indices(8, 3, 0).unwrap();
        let mut source = SyntheticSource::with_rng(settings, StdRng::seed_from_u64(7));
        let mut peak = 0.0f64;
        let mut sum = [0.0f64; 3];
        for _ in 0..1920 {
            let s = source.next_sample().unwrap();
            // amplitude 45 plus at most 2.5 of noise
            for ch in 0..3 {
                assert!(s.channel(ch).abs() <= 47.5);
                sum[ch] += s.channel(ch);
            }
            peak = peak.max(s.0.abs());
            // three balanced phases cancel out, leaving only the noise terms
            assert!((s.0 + s.1 + s.2).abs() <= 7.5);
        }
        assert!(peak > 40.0);
        for total in sum {
            assert!((total / 1920.0).abs() < 1.0);
        }
    }

    #[test]
    fn synthetic_settings_rescale_and_repace() {
        let mut source = SyntheticSource::with_rng(
            AcquisitionSettings::default(),
            StdRng::seed_from_u64(1),
        );
        let slow = source
            .settings()
            .with_command(ControlCommand::Rate(0))
            .unwrap()
            .unwrap();
        source.configure(slow).unwrap();
        assert_eq!(source.idle_delay(), Duration::from_millis(500));
        let small = slow.with_command(ControlCommand::Range(0)).unwrap().unwrap();
        source.configure(small).unwrap();
        for _ in 0..100 {
            let s = source.next_sample().unwrap();
            assert!(s.0.abs() <= 9.0 * 0.625 + 0.5 * 0.625);
        }
    }
}
