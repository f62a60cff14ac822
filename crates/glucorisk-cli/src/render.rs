//! Output rendering

use glucorisk_classifiers::ModelMetadata;
use glucorisk_core::{Feature, RiskAssessment, RiskTier};
use glucorisk_policy::RiskPolicy;
use std::io::{self, Write};
use std::path::Path;

/// Human-readable assessment, as shown below the form
pub fn render_text(out: &mut impl Write, assessment: &RiskAssessment) -> io::Result<()> {
    writeln!(
        out,
        "The probability of having diabetes is: {:.2}",
        assessment.probability()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", assessment.label())?;
    writeln!(out)?;
    writeln!(out, "{}", assessment.advice().trim_end())?;
    Ok(())
}

/// Assessment as a single JSON document
pub fn render_json(out: &mut impl Write, assessment: &RiskAssessment) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, assessment)?;
    writeln!(out)
}

struct TierRow<'a> {
    tier: RiskTier,
    range: String,
    label: &'a str,
}

/// Loaded model and active policy, for `inspect`
pub fn render_inspect(
    out: &mut impl Write,
    path: &Path,
    metadata: &ModelMetadata,
    policy: &RiskPolicy,
) -> io::Result<()> {
    writeln!(out, "Model")?;
    writeln!(out, "  path:   {}", path.display())?;
    writeln!(out, "  name:   {}", metadata.name)?;
    writeln!(out, "  format: {}", metadata.format)?;
    for (key, value) in &metadata.details {
        writeln!(out, "  {}: {}", key, value)?;
    }

    writeln!(out)?;
    writeln!(out, "Features")?;
    for feature in Feature::ALL {
        writeln!(
            out,
            "  {}. {:<16} {}",
            feature.index(),
            feature.name(),
            feature.domain()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Policy {} (version {})", policy.name(), policy.version())?;
    writeln!(
        out,
        "  profile: {} (available: {})",
        policy.profile(),
        policy.profile_names().join(", ")
    )?;
    for row in tier_rows(policy) {
        writeln!(out, "  {:<6} {:<14} {}", row.tier, row.range, row.label)?;
    }
    Ok(())
}

fn tier_rows(policy: &RiskPolicy) -> Vec<TierRow<'_>> {
    let thresholds = policy.thresholds();
    RiskTier::ALL
        .iter()
        .map(|&tier| {
            let range = match tier {
                RiskTier::Low => format!("[0, {})", thresholds.low()),
                RiskTier::Medium => format!("[{}, {})", thresholds.low(), thresholds.high()),
                RiskTier::High => format!("[{}, 1]", thresholds.high()),
            };
            TierRow {
                tier,
                range,
                label: policy.label_for(tier),
            }
        })
        .collect()
}
