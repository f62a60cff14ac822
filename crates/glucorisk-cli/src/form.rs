//! Interactive input form
//!
//! Prompts for each field in turn. An empty answer keeps the value shown in
//! parentheses, so pressing enter through the whole form scores the initial
//! values. Input the classifier cannot accept is reported inline and the form
//! is shown again with the previous answers as defaults.

use crate::render::render_text;
use glucorisk_classifiers::Scorer;
use glucorisk_core::{Categorical, Feature, FeatureDomain, PatientInput};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::{debug, warn};

/// Line-oriented form over any reader and writer
pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run the form until the user stops or input ends.
    ///
    /// Returns the number of patients scored. Validation errors never end the
    /// session; any other scoring error does.
    pub fn run(&mut self, scorer: &Scorer) -> anyhow::Result<usize> {
        writeln!(self.output, "Diabetes Risk Prediction")?;
        writeln!(
            self.output,
            "Press enter to keep the value in parentheses. Ctrl-D quits."
        )?;

        let mut previous = PatientInput::default();
        let mut scored = 0;

        loop {
            writeln!(self.output)?;
            let Some(input) = self.fill(&previous)? else {
                break;
            };
            previous = input.clone();

            match scorer.score_input(&input) {
                Ok(assessment) => {
                    writeln!(self.output)?;
                    render_text(&mut self.output, &assessment)?;
                    scored += 1;
                }
                Err(e) if e.is_validation() => {
                    warn!(error = %e, "Rejected form input");
                    writeln!(self.output, "Invalid input: {}", e)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            writeln!(self.output)?;
            if !self.confirm("Score another patient?")? {
                break;
            }
        }

        debug!(scored, "Form session finished");
        Ok(scored)
    }

    /// Ask for every field; `None` when input ends
    fn fill(&mut self, current: &PatientInput) -> io::Result<Option<PatientInput>> {
        macro_rules! field {
            ($expr:expr) => {
                match $expr? {
                    Some(value) => value,
                    None => return Ok(None),
                }
            };
        }

        Ok(Some(PatientInput {
            gender: field!(self.choose("Gender", current.gender)),
            age: field!(self.ask("Age", &range_hint(Feature::Age), current.age)),
            hypertension: field!(self.choose("Hypertension", current.hypertension)),
            heart_disease: field!(self.choose("Heart Disease", current.heart_disease)),
            smoking_history: field!(self.choose("Smoking History", current.smoking_history)),
            bmi: field!(self.ask("BMI", &range_hint(Feature::Bmi), current.bmi)),
            hba1c: field!(self.ask("HbA1c Level", &range_hint(Feature::Hba1c), current.hba1c)),
            blood_glucose: field!(self.ask(
                "Blood Glucose Level",
                &range_hint(Feature::BloodGlucose),
                current.blood_glucose
            )),
        }))
    }

    fn choose<T>(&mut self, label: &str, current: T) -> io::Result<Option<T>>
    where
        T: Categorical + FromStr + Display,
        T::Err: Display,
    {
        let hint = T::TABLE
            .iter()
            .map(|(_, name, _)| *name)
            .collect::<Vec<_>>()
            .join("/");
        self.ask(label, &hint, current)
    }

    /// Prompt until the answer parses; `None` on end of input
    fn ask<T>(&mut self, label: &str, hint: &str, current: T) -> io::Result<Option<T>>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        loop {
            write!(self.output, "{} [{}] ({}): ", label, hint, current)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(Some(current));
            }

            match answer.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "  could not read '{}': {}", answer, e)?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N]: ", question)?;
        self.output.flush()?;

        Ok(self
            .read_line()?
            .map(|line| matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn range_hint(feature: Feature) -> String {
    match feature.domain() {
        FeatureDomain::Continuous { min, max } => format!("{}-{}", min, max),
        other => other.to_string(),
    }
}
