use crate::dispatch::ActuationDispatcher;
use hinge_display::ScreenController;
use hinge_input::DeviceBinder;
use hinge_posture::{Classification, Classifier, DaemonState, StabilityGate, Transition};
use hinge_sensor::{FusionEngine, PostureSnapshot, SensorError, SensorReader};
use tracing::{debug, info, warn};

/// Target of the per-tick diagnostic line, silenced by `--quiet`.
pub const TICK_TARGET: &str = "hinge_daemon::tick";

/// What happened during one tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// Redundant sensors disagreed; nothing was classified or actuated.
    Dropped(SensorError),
    Classified {
        classification: Classification,
        transition: Transition,
    },
}

/// One pass of the pipeline per call: read, fuse, classify, gate, actuate.
pub struct Daemon<R, S, B> {
    reader: R,
    fusion: FusionEngine,
    classifier: Classifier,
    gate: StabilityGate,
    dispatcher: ActuationDispatcher<S, B>,
    report: bool,
    ticks: u64,
    dropped: u64,
}

impl<R, S, B> Daemon<R, S, B>
where
    R: SensorReader,
    S: ScreenController,
    B: DeviceBinder,
{
    pub fn new(
        reader: R,
        fusion: FusionEngine,
        classifier: Classifier,
        dispatcher: ActuationDispatcher<S, B>,
    ) -> Self {
        Self {
            reader,
            fusion,
            classifier,
            gate: StabilityGate::new(),
            dispatcher,
            report: true,
            ticks: 0,
            dropped: 0,
        }
    }

    /// Enable or disable the per-tick diagnostic line.
    pub fn with_report(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    pub fn state(&self) -> DaemonState {
        self.gate.state()
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> &ActuationDispatcher<S, B> {
        &self.dispatcher
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;
        let raw = self.reader.read();
        debug!(?raw, "Raw readings");

        let snapshot = match self.fusion.fuse(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.dropped += 1;
                return TickOutcome::Dropped(e);
            }
        };

        let classification = self.classifier.classify(&snapshot);
        if self.report {
            info!(target: TICK_TARGET, "{}", diagnostic_line(&snapshot, &classification));
        }

        let transition = self.gate.observe(&classification);
        for failure in self.dispatcher.dispatch(&transition) {
            warn!(%failure, "Actuation failed");
        }

        if self.ticks % 3600 == 0 {
            debug!(ticks = self.ticks, dropped = self.dropped, "Daemon heartbeat");
        }

        TickOutcome::Classified {
            classification,
            transition,
        }
    }
}

/// Fixed-width summary: magnitude, latitude and longitude of the screen
/// followed by its orientation, then the same for the keyboard followed by
/// the form factor.
pub fn diagnostic_line(snapshot: &PostureSnapshot, classification: &Classification) -> String {
    let s = &snapshot.screen_polar;
    let k = &snapshot.keyboard_polar;
    format!(
        "{:10.0}{:8.2}{:8.2}{:>11}{:10.0}{:8.2}{:8.2}{:>11}",
        s.magnitude,
        s.latitude,
        s.longitude,
        classification.orientation.label(),
        k.magnitude,
        k.latitude,
        k.longitude,
        classification.formfactor.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScreen, MemoryBinder};
    use hinge_config::FormfactorAction;
    use hinge_input::{DriverBinding, PanelSwitch};
    use hinge_posture::{Formfactor, Orientation};
    use hinge_sensor::{IioReader, RawTick, ScriptedReader, SensorPairSample, Vector3};

    fn agreeing(x: f64, y: f64, z: f64) -> SensorPairSample {
        let v = Vector3::new(x, y, z);
        SensorPairSample::new(v, v)
    }

    /// Screen upright along x, keyboard lying with gravity on +z.
    fn laptop_tick() -> RawTick {
        RawTick {
            screen: agreeing(1000.0, 0.0, 0.0),
            keyboard: agreeing(0.0, 0.0, 1000.0),
        }
    }

    fn tablet_tick() -> RawTick {
        RawTick {
            screen: agreeing(1000.0, 0.0, 0.0),
            keyboard: agreeing(0.0, 0.0, -1000.0),
        }
    }

    fn faulty_tick() -> RawTick {
        RawTick {
            screen: SensorPairSample::new(
                Vector3::new(100.0, 100.0, 100.0),
                Vector3::new(100.0, 100.0, 250_000.0),
            ),
            keyboard: agreeing(0.0, 0.0, -1000.0),
        }
    }

    fn flat_tick() -> RawTick {
        RawTick {
            screen: agreeing(0.0, 0.0, 1000.0),
            keyboard: agreeing(0.0, 0.0, 1000.0),
        }
    }

    fn daemon<R: SensorReader>(reader: R) -> Daemon<R, FakeScreen, MemoryBinder> {
        let dispatcher = ActuationDispatcher::new(
            FakeScreen::default(),
            MemoryBinder::default(),
            PanelSwitch::new(
                DriverBinding::new("/drv/goodix", "touch"),
                DriverBinding::new("/drv/hid", "pen"),
            ),
            true,
            FormfactorAction::DriverBind,
        );
        Daemon::new(reader, FusionEngine::default(), Classifier::default(), dispatcher)
            .with_report(false)
    }

    #[test]
    fn second_identical_laptop_tick_dispatches_nothing() {
        let mut d = daemon(ScriptedReader::new(vec![laptop_tick(), laptop_tick()]));

        let TickOutcome::Classified { transition, .. } = d.tick() else {
            panic!("first tick dropped");
        };
        assert_eq!(transition.formfactor, Some(Formfactor::Laptop));
        assert_eq!(transition.orientation, Some(Orientation::Downward));

        let TickOutcome::Classified { transition, .. } = d.tick() else {
            panic!("second tick dropped");
        };
        assert!(transition.is_empty());
        assert_eq!(d.dispatcher().parts().1.writes, ["bind touch"]);
        assert_eq!(d.dispatcher().parts().0.rotations, [Orientation::Downward]);
    }

    #[test]
    fn faulty_tick_changes_nothing() {
        let mut d = daemon(ScriptedReader::new(vec![laptop_tick(), faulty_tick()]));
        d.tick();
        let before = d.state();

        assert!(matches!(d.tick(), TickOutcome::Dropped(SensorError::Fault { .. })));
        assert_eq!(d.state(), before);
        assert_eq!(d.dispatcher().parts().1.writes, ["bind touch"]);
        assert_eq!(d.dispatcher().parts().0.rotations.len(), 1);
    }

    #[test]
    fn flat_screen_keeps_last_rotation() {
        let mut d = daemon(ScriptedReader::new(vec![laptop_tick(), flat_tick(), laptop_tick()]));
        d.tick();

        let TickOutcome::Classified { classification, transition } = d.tick() else {
            panic!("flat tick dropped");
        };
        assert_eq!(classification.orientation, Orientation::Horizontal);
        assert_eq!(transition.orientation, None);
        assert_eq!(d.state().orientation, Orientation::Downward);

        d.tick();
        assert_eq!(d.dispatcher().parts().0.rotations, [Orientation::Downward]);
    }

    #[test]
    fn failed_actuation_still_updates_state() {
        let mut d = daemon(ScriptedReader::new(vec![laptop_tick(), laptop_tick()]));
        d.dispatcher.screen_mut().fail = true;

        d.tick();
        assert_eq!(d.state().orientation, Orientation::Downward);
        d.tick();
        // Not retried while the classification stays the same.
        assert_eq!(d.dispatcher().parts().0.rotations.len(), 1);
    }

    #[test]
    fn folding_to_tablet_and_back_restores_the_panel() {
        let mut d = daemon(ScriptedReader::new(vec![
            laptop_tick(),
            tablet_tick(),
            tablet_tick(),
            laptop_tick(),
        ]));
        for _ in 0..4 {
            d.tick();
        }
        assert_eq!(
            d.dispatcher().parts().1.writes,
            ["bind touch", "unbind touch", "bind touch"]
        );
        assert_eq!(d.state().formfactor, Formfactor::Laptop);
    }

    #[test]
    fn reads_real_sysfs_layout() {
        let root = tempfile::tempdir().unwrap();
        // screen primary, keyboard primary, screen secondary, keyboard secondary
        let devices = [
            ["980", "10", "-20"],
            ["0", "0", "1010"],
            ["1020", "-10", "20"],
            ["0", "0", "990"],
        ];
        for (n, values) in devices.iter().enumerate() {
            let dir = root.path().join(format!("iio:device{n}"));
            std::fs::create_dir_all(&dir).unwrap();
            for (axis, value) in ["x", "y", "z"].iter().zip(values) {
                std::fs::write(dir.join(format!("in_accel_{axis}_raw")), value).unwrap();
            }
        }

        let mut d = daemon(IioReader::open(root.path()).unwrap());
        let TickOutcome::Classified { classification, .. } = d.tick() else {
            panic!("tick dropped");
        };
        assert_eq!(classification.orientation, Orientation::Downward);
        assert_eq!(classification.formfactor, Formfactor::Laptop);
    }

    #[test]
    fn diagnostic_line_has_fixed_columns() {
        let snapshot = PostureSnapshot::new(
            Vector3::new(1000.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1000.0),
        );
        let classification = Classifier::default().classify(&snapshot);
        let line = diagnostic_line(&snapshot, &classification);
        assert_eq!(line.len(), 10 + 8 + 8 + 11 + 10 + 8 + 8 + 11);
        assert!(line.contains("downward"));
        assert!(line.ends_with("laptop"));
    }
}
