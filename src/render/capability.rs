use std::env;
use std::io;
use std::sync::OnceLock;

use crossterm::tty::IsTty;
use tracing::debug;

/// Output strategy chosen once per process. A misdetected tier can still be
/// downgraded mid-session by the renderer, never upgraded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderTier {
    /// Reposition the cursor and overwrite the previous frame in place.
    FullAnsi,
    /// Clear the screen and reprint everything.
    ClearReprint,
    /// Plain line output with movement summaries; for constrained hosts.
    MinimalDiff,
}

impl RenderTier {
    pub fn downgrade(self) -> Option<RenderTier> {
        match self {
            RenderTier::FullAnsi => Some(RenderTier::ClearReprint),
            RenderTier::ClearReprint => Some(RenderTier::MinimalDiff),
            RenderTier::MinimalDiff => None,
        }
    }

    /// Parse an explicit mode override as written in config/CLI.
    pub fn from_name(name: &str) -> Option<RenderTier> {
        match name {
            "full" => Some(RenderTier::FullAnsi),
            "clear" => Some(RenderTier::ClearReprint),
            "diff" => Some(RenderTier::MinimalDiff),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCapability {
    pub tier: RenderTier,
    pub compact: bool,
}

impl RenderCapability {
    /// Inspect environment signals and classify the terminal. Called once;
    /// consumers treat the result as read-only for the whole process.
    pub fn detect() -> Self {
        let caps = Self::classify(
            io::stdout().is_tty(),
            env::var("TERM").ok().as_deref(),
            env::var("COLUMNS").ok().and_then(|c| c.parse().ok()),
        );
        debug!("terminal capability: {:?}", caps);
        caps
    }

    /// Cached per-process detection result.
    pub fn current() -> Self {
        static CAPS: OnceLock<RenderCapability> = OnceLock::new();
        *CAPS.get_or_init(Self::detect)
    }

    /// Detection with explicit overrides applied on top: an override tier
    /// wins outright, and `force_compact` can only tighten the output.
    pub fn resolve(override_tier: Option<RenderTier>, force_compact: bool) -> Self {
        let detected = Self::current();
        Self {
            tier: override_tier.unwrap_or(detected.tier),
            compact: detected.compact || force_compact,
        }
    }

    fn classify(is_tty: bool, term: Option<&str>, columns: Option<u16>) -> Self {
        if !is_tty {
            // Piped or captured output: no cursor games, no decoration.
            return Self {
                tier: RenderTier::MinimalDiff,
                compact: true,
            };
        }
        let narrow = columns.is_some_and(|c| c < 60);
        let tier = match term {
            Some("dumb") => RenderTier::MinimalDiff,
            // No TERM hint at all: repositioning is a gamble, reprinting isn't.
            None => RenderTier::ClearReprint,
            Some(_) => RenderTier::FullAnsi,
        };
        Self {
            tier,
            compact: narrow,
        }
    }
}
