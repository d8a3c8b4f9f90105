use std::path::PathBuf;

use tetrisml_evaluator::AiParameters;
use tracing::debug;

use crate::util;

/// Where the AI weights come from. Defaults apply when neither flag is set.
#[derive(Default, Debug, Clone, clap::Args)]
#[group(multiple = false)]
pub(crate) struct WeightsSource {
    /// AI weights as `height,holes,lines,bumpiness`
    #[arg(long, allow_hyphen_values = true, value_name = "H,HOLES,LINES,BUMP")]
    weights: Option<AiParameters>,
    /// JSON file with AI weights
    #[arg(long, value_name = "PATH")]
    weights_file: Option<PathBuf>,
}

impl WeightsSource {
    pub(crate) fn load(&self) -> anyhow::Result<AiParameters> {
        let parameters = match (&self.weights, &self.weights_file) {
            (Some(parameters), _) => *parameters,
            (None, Some(path)) => util::read_json_file("weights", path)?,
            (None, None) => AiParameters::default(),
        };
        debug!(?parameters, "AI weights loaded");
        Ok(parameters)
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WeightsArg {
    #[command(flatten)]
    weights: WeightsSource,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &WeightsArg) -> anyhow::Result<()> {
    let parameters = arg.weights.load()?;
    util::save_json(&parameters, arg.output.as_deref())
}
