use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(about = "Recovers an ABI sketch from EVM bytecode",
       override_usage = "mimir sketch <TARGET> [OPTIONS]")]
pub struct SketchArgs {
    /// The target to scan, either raw bytecode or the path of a file
    /// containing it.
    #[clap(required = true)]
    pub target: String,

    /// Drop selectors whose claimed jump destination was never observed as a
    /// JUMPDEST.
    #[clap(long, short)]
    pub strict: bool,
}

#[derive(Debug, Clone)]
pub struct SketchArgsBuilder {
    /// The target to scan, either raw bytecode or the path of a file
    /// containing it.
    target: Option<String>,

    /// Drop selectors whose claimed jump destination was never observed as a
    /// JUMPDEST.
    strict: Option<bool>,
}

impl Default for SketchArgsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchArgsBuilder {
    pub fn new() -> Self {
        Self { target: Some(String::new()), strict: Some(false) }
    }

    pub fn target(&mut self, target: String) -> &mut Self {
        self.target = Some(target);
        self
    }

    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = Some(strict);
        self
    }

    pub fn build(&self) -> eyre::Result<SketchArgs> {
        Ok(SketchArgs {
            target: self.target.clone().ok_or_else(|| eyre::eyre!("target is required"))?,
            strict: self.strict.ok_or_else(|| eyre::eyre!("strict is required"))?,
        })
    }
}
