//! Interactive registration / login console.
//!
//! Menu-driven loop over any `BufRead`/`Write` pair. Registered users live
//! only in the injected [`Registry`]; attendance is printed, never stored.

use crate::registry::Registry;
use crate::simulation::{FaceDetector, FaceRecognizer};
use crate::types::Recognition;
use std::io::{self, BufRead, Write};
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Register,
    Login,
    ShowUsers,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Register),
            "2" => Some(MenuChoice::Login),
            "3" => Some(MenuChoice::ShowUsers),
            "4" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub struct Console<D, R, I, O> {
    registry: Registry,
    detector: D,
    recognizer: R,
    input: I,
    output: O,
    /// Pause standing in for webcam capture before each login.
    scan_delay: Duration,
}

impl<D, R, I, O> Console<D, R, I, O>
where
    D: FaceDetector,
    R: FaceRecognizer,
    I: BufRead,
    O: Write,
{
    pub fn new(registry: Registry, detector: D, recognizer: R, input: I, output: O) -> Self {
        Self {
            registry,
            detector,
            recognizer,
            input,
            output,
            scan_delay: Duration::ZERO,
        }
    }

    pub fn with_scan_delay(mut self, delay: Duration) -> Self {
        self.scan_delay = delay;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Consume the console, returning the session registry and output sink.
    pub fn into_parts(self) -> (Registry, O) {
        (self.registry, self.output)
    }

    /// Run the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== Face Recognition System ===")?;
            writeln!(self.output, "1. Register New User")?;
            writeln!(self.output, "2. Face Recognition Login")?;
            writeln!(self.output, "3. Show Registered Users")?;
            writeln!(self.output, "4. Exit")?;

            let Some(line) = self.prompt("Enter your choice: ")? else {
                tracing::debug!("input closed, leaving menu");
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Register) => self.register()?,
                Some(MenuChoice::Login) => {
                    self.login()?;
                }
                Some(MenuChoice::ShowUsers) => self.show_users()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting system. Goodbye.")?;
                    return Ok(());
                }
                None => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
    }

    /// Prompt for a name and roll number and add them to the registry.
    pub fn register(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Register User ---")?;
        let name = self.prompt("Enter your name: ")?.unwrap_or_default();
        let roll_no = self.prompt("Enter your roll number: ")?.unwrap_or_default();

        match self.registry.register(&name, &roll_no) {
            Ok(()) => {
                tracing::info!(name = name.trim(), roll_no = roll_no.trim(), "user registered");
                writeln!(
                    self.output,
                    "[REGISTERED] Name: {}, Roll No: {}",
                    name.trim(),
                    roll_no.trim()
                )
            }
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    /// Simulate a webcam scan and report who was recognized.
    pub fn login(&mut self) -> io::Result<Recognition> {
        writeln!(self.output, "\n--- Face Recognition Login ---")?;
        writeln!(self.output, "Simulating webcam input and face scan...")?;
        self.output.flush()?;
        if !self.scan_delay.is_zero() {
            std::thread::sleep(self.scan_delay);
        }

        let Some(face) = self.detector.detect_faces().into_iter().next() else {
            writeln!(self.output, "No face detected.")?;
            return Ok(Recognition::Unknown);
        };

        if self.registry.is_empty() {
            writeln!(self.output, "No users in database.")?;
        }

        let recognition = self.recognizer.recognize(&face, &self.registry);
        match &recognition {
            Recognition::Unknown => writeln!(self.output, "Face not recognized.")?,
            Recognition::Known(name) => {
                writeln!(self.output, "Face recognized: {name}")?;
                let age = self.detector.predict_age(&face);
                writeln!(self.output, "Predicted age for {name}: {age}")?;
                let emotion = self.detector.predict_emotion(&face);
                writeln!(self.output, "Predicted emotion: {emotion}")?;
                writeln!(
                    self.output,
                    "[ATTENDANCE SIMULATED] {name} would be marked present at {}",
                    chrono::Local::now().format(TIMESTAMP_FORMAT)
                )?;
            }
        }
        Ok(recognition)
    }

    pub fn show_users(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n[User Table]")?;
        if self.registry.is_empty() {
            writeln!(self.output, "No users registered.")?;
        } else {
            for (name, roll_no) in self.registry.iter() {
                writeln!(self.output, "Name: {name}, Roll No: {roll_no}")?;
            }
        }
        writeln!(self.output)
    }

    /// Print `label`, read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
