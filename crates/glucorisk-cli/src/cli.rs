use clap::{Args, Parser, Subcommand};
use glucorisk_core::{Gender, PatientInput, SmokingHistory, YesNo};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "glucorisk")]
#[command(
    author,
    version,
    about = "Diabetes risk scoring with a pre-trained classifier"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "glucorisk.yaml", global = true)]
    pub config: String,

    /// Model artifact path (.json XGBoost model or .safetensors head)
    #[arg(short, long, global = true)]
    pub model: Option<PathBuf>,

    /// Risk policy file (thresholds and advice)
    #[arg(long, global = true)]
    pub policy: Option<PathBuf>,

    /// Threshold profile to apply, e.g. standard or wide
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one patient given on the command line
    Score(ScoreArgs),

    /// Fill in the form interactively, scoring as many patients as needed
    Interactive,

    /// Show the loaded model and the active risk policy
    Inspect,
}

/// Form fields; omitted fields take the form's initial values
#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// male or female
    #[arg(long, default_value = "male")]
    pub gender: Gender,

    /// Age in years (0-100)
    #[arg(long, default_value_t = 25)]
    pub age: u8,

    /// yes or no
    #[arg(long, default_value = "no")]
    pub hypertension: YesNo,

    /// yes or no
    #[arg(long, default_value = "no")]
    pub heart_disease: YesNo,

    /// non-smoker, past-smoker or current-smoker
    #[arg(long, default_value = "non-smoker")]
    pub smoking: SmokingHistory,

    /// Body mass index (10-50)
    #[arg(long, default_value_t = 22.0)]
    pub bmi: f32,

    /// HbA1c level (3-15)
    #[arg(long, default_value_t = 5.5)]
    pub hba1c: f32,

    /// Blood glucose level (50-400)
    #[arg(long, default_value_t = 100.0)]
    pub glucose: f32,

    /// Print the assessment as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScoreArgs {
    pub fn to_input(&self) -> PatientInput {
        PatientInput {
            gender: self.gender,
            age: self.age,
            hypertension: self.hypertension,
            heart_disease: self.heart_disease,
            smoking_history: self.smoking,
            bmi: self.bmi,
            hba1c: self.hba1c,
            blood_glucose: self.glucose,
        }
    }
}
