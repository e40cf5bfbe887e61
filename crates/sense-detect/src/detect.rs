//! The capability ladder — combining evidence into a color verdict.
//!
//! Detection runs a fixed sequence of rules over one evidence snapshot.
//! The rules are upgrade-only: each can raise the support level, none can
//! lower it, so the strongest evidence always wins no matter where it
//! sits in the sequence. A native VT-capable console host decides the
//! question outright; everything else is inference from conventional
//! environment hints.
//!
//! Alongside the support level, detection picks the basic 16-color table
//! the terminal most likely renders, because "red" means a different RGB
//! on a legacy console than under xterm. Remote sessions deliberately
//! ignore local console evidence — the console being described is on the
//! wrong machine.

use std::fmt;

use tracing::debug;

use sense_console::backend::Console;
use sense_palette::{PaletteTable, tables};

use crate::signals::DetectionSignals;
use crate::support::ColorSupport;

/// Builds after this one interpret VT escape sequences natively
/// (10.0.10586 was the first console host to ship the feature).
pub const VT_CAPABLE_BUILD: u32 = 10_586;

/// Builds after this one ship the refreshed default palette
/// (10.0.16299 was the last with the legacy colors).
pub const MODERN_PALETTE_BUILD: u32 = 16_299;

/// Truecolor announcements recognized in the `COLORTERM` convention,
/// matched exactly.
const TRUECOLOR_TOKENS: [&str; 2] = ["truecolor", "24bit"];

/// Terminal type that implies truecolor by itself.
const CYGWIN_TERM: &str = "cygwin";

/// Where the chosen palette table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteSource {
    /// No palette chosen: color support is absent.
    Unknown,
    /// Supplied by the caller ahead of detection.
    Explicit,
    /// Remote session — local console evidence describes the wrong
    /// machine, so xterm defaults apply.
    SshFallback,
    /// No console host version to band on: xterm defaults.
    DefaultFallback,
    /// The refreshed console host palette.
    ModernConsole,
    /// The long-standing legacy console palette.
    LegacyConsole,
}

impl fmt::Display for PaletteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Explicit => "explicit",
            Self::SshFallback => "ssh (xterm)",
            Self::DefaultFallback => "default (xterm)",
            Self::ModernConsole => "console_modern",
            Self::LegacyConsole => "console_legacy",
        })
    }
}

/// Resolves color names to RGB. Supplied by the host application when it
/// has a name table; detection only records whether one is present.
pub trait NamedColorLookup {
    /// RGB for a color name, or `None` when the name is unknown.
    fn rgb(&self, name: &str) -> Option<(u8, u8, u8)>;
}

/// The detection verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Detected support level.
    pub support: ColorSupport,
    /// The basic 16-color table in effect, present whenever any color
    /// support was found.
    pub palette: Option<&'static PaletteTable>,
    /// How the palette was chosen.
    pub source: PaletteSource,
    /// Whether named-color resolution is available. Only meaningful on
    /// truecolor terminals; 16- and 256-color output has no use for it.
    pub named_colors: bool,
}

/// Runs the capability ladder over a console and an evidence snapshot.
pub struct Detector<'a> {
    console: &'a dyn Console,
    explicit_palette: Option<&'static PaletteTable>,
    named_colors: Option<&'a dyn NamedColorLookup>,
}

impl<'a> Detector<'a> {
    #[must_use]
    pub fn new(console: &'a dyn Console) -> Self {
        Self {
            console,
            explicit_palette: None,
            named_colors: None,
        }
    }

    /// Pins the basic palette instead of letting detection band one.
    /// Ignored when no color support is found at all.
    #[must_use]
    pub const fn with_palette(mut self, palette: &'static PaletteTable) -> Self {
        self.explicit_palette = Some(palette);
        self
    }

    /// Supplies a named-color lookup for truecolor terminals.
    #[must_use]
    pub const fn with_named_colors(mut self, lookup: &'a dyn NamedColorLookup) -> Self {
        self.named_colors = Some(lookup);
        self
    }

    /// Runs the ladder. Never fails: a platform call that errors simply
    /// leaves its rung unmatched and the ladder continues.
    #[must_use]
    pub fn detect(&self, signals: &DetectionSignals) -> Detection {
        let mut support = ColorSupport::None;

        // Rung 1 — a console host new enough to interpret VT natively,
        // provided the switch actually lands on both output streams.
        let host_vt_capable = signals
            .os_version()
            .is_some_and(|version| version.build > VT_CAPABLE_BUILD);
        if host_vt_capable {
            match self.console.enable_vt() {
                Ok(report) if report.all_enabled() => {
                    support = ColorSupport::Truecolor;
                    debug!(
                        stdout = %report.stdout,
                        stderr = %report.stderr,
                        "VT processing active on both streams"
                    );
                }
                Ok(report) => {
                    debug!(
                        stdout = %report.stdout,
                        stderr = %report.stderr,
                        "VT enable refused on a stream"
                    );
                }
                Err(error) => debug!(%error, "VT enable failed"),
            }
        }

        // Environment rungs — only consulted when the VT rung did not
        // already decide. Each can only upgrade the level.
        if support != ColorSupport::Truecolor {
            let term = signals.term().unwrap_or_default();
            if signals.wrapper_active() || term.starts_with("xterm") {
                support = support.max(ColorSupport::Basic);
            }
            if signals.extended_hint() || term.contains("256color") {
                support = support.max(ColorSupport::Extended);
            }
            let colorterm_announces = signals
                .colorterm()
                .is_some_and(|value| TRUECOLOR_TOKENS.contains(&value));
            if colorterm_announces || term == CYGWIN_TERM {
                support = support.max(ColorSupport::Truecolor);
            }
        }

        let (palette, source) = if support == ColorSupport::None {
            (None, PaletteSource::Unknown)
        } else if let Some(table) = self.explicit_palette {
            (Some(table), PaletteSource::Explicit)
        } else {
            let (table, source) = banded_palette(signals);
            (Some(table), source)
        };

        let named_colors = support == ColorSupport::Truecolor && self.named_colors.is_some();
        if support == ColorSupport::Truecolor && self.named_colors.is_none() {
            // Not an error — color names simply stay unresolved.
            debug!("no named-color lookup supplied; name resolution disabled");
        }

        debug!(
            support = %support,
            term = signals.term().unwrap_or_default(),
            colorterm = signals.colorterm().unwrap_or_default(),
            palette = %source,
            named_colors,
            "terminal capability detection complete"
        );

        Detection {
            support,
            palette,
            source,
            named_colors,
        }
    }
}

/// Palette banding when the caller did not pin a table: remote sessions
/// get xterm defaults, otherwise the console host build picks between
/// the legacy and refreshed tables, and no version at all means standard
/// terminal defaults.
fn banded_palette(signals: &DetectionSignals) -> (&'static PaletteTable, PaletteSource) {
    if signals.ssh_session() {
        return (&tables::XTERM, PaletteSource::SshFallback);
    }
    match signals.os_version() {
        Some(version) if version.build > MODERN_PALETTE_BUILD => {
            (&tables::CONSOLE_MODERN, PaletteSource::ModernConsole)
        }
        Some(_) => (&tables::CONSOLE_LEGACY, PaletteSource::LegacyConsole),
        None => (&tables::XTERM, PaletteSource::DefaultFallback),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sense_console::script::{ScriptedConsole, ScriptedEvent};
    use sense_console::state::{VtReport, VtSwitch};

    use super::*;

    fn vt_ok() -> VtReport {
        VtReport {
            stdout: VtSwitch::Enabled,
            stderr: VtSwitch::Enabled,
        }
    }

    fn run(console: &ScriptedConsole, signals: &DetectionSignals) -> Detection {
        Detector::new(console).detect(signals)
    }

    struct FixedLookup;

    impl NamedColorLookup for FixedLookup {
        fn rgb(&self, name: &str) -> Option<(u8, u8, u8)> {
            (name == "red").then_some((255, 0, 0))
        }
    }

    // ─── The VT rung ─────────────────────────────────────────────

    #[test]
    fn vt_capable_host_with_working_switch_is_truecolor() {
        let console = ScriptedConsole::new().with_vt_report(vt_ok());
        let signals = DetectionSignals::new().with_build(10_587);
        let detection = run(&console, &signals);

        assert_eq!(detection.support, ColorSupport::Truecolor);
        // A build this old still bands to the legacy palette.
        assert_eq!(detection.source, PaletteSource::LegacyConsole);
        assert_eq!(detection.palette, Some(&tables::CONSOLE_LEGACY));
    }

    #[test]
    fn vt_rung_needs_a_build_strictly_past_the_threshold() {
        let console = ScriptedConsole::new().with_vt_report(vt_ok());
        let signals = DetectionSignals::new().with_build(VT_CAPABLE_BUILD);
        let detection = run(&console, &signals);

        assert_eq!(detection.support, ColorSupport::None);
        // The gate fails before the switch is even attempted.
        assert_eq!(console.events(), vec![]);
    }

    #[test]
    fn vt_rung_is_skipped_without_a_host_version() {
        let console = ScriptedConsole::new().with_vt_report(vt_ok());
        let detection = run(&console, &DetectionSignals::new());

        assert_eq!(detection.support, ColorSupport::None);
        assert_eq!(console.events(), vec![]);
    }

    #[test]
    fn vt_rung_requires_both_streams() {
        let refused = VtReport {
            stdout: VtSwitch::Enabled,
            stderr: VtSwitch::Refused,
        };
        let console = ScriptedConsole::new().with_vt_report(refused);
        let signals = DetectionSignals::new().with_build(19_041);

        assert_eq!(run(&console, &signals).support, ColorSupport::None);
        assert_eq!(console.events(), vec![ScriptedEvent::VtRequested]);
    }

    #[test]
    fn vt_switch_failure_falls_through_to_the_environment() {
        // No scripted VT report: the enable call errors.
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new()
            .with_build(19_041)
            .with_term("xterm");

        assert_eq!(run(&console, &signals).support, ColorSupport::Basic);
    }

    // ─── Environment rungs ───────────────────────────────────────

    #[rstest]
    #[case::bare_xterm("xterm", ColorSupport::Basic)]
    #[case::xterm_flavor("xterm-kitty", ColorSupport::Basic)]
    #[case::xterm_256("xterm-256color", ColorSupport::Extended)]
    #[case::screen_256("screen-256color", ColorSupport::Extended)]
    #[case::cygwin("cygwin", ColorSupport::Truecolor)]
    #[case::cygwin_flavor("cygwin-extra", ColorSupport::None)]
    #[case::dumb("dumb", ColorSupport::None)]
    fn terminal_type_sets_the_level(#[case] term: &str, #[case] expected: ColorSupport) {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_term(term);
        assert_eq!(run(&console, &signals).support, expected);
    }

    #[test]
    fn wrapper_alone_gives_basic() {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_wrapper_active(true);
        let detection = run(&console, &signals);

        assert_eq!(detection.support, ColorSupport::Basic);
        assert_eq!(detection.source, PaletteSource::DefaultFallback);
    }

    #[test]
    fn extended_hint_upgrades_without_basic_evidence() {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_extended_hint(true);
        assert_eq!(run(&console, &signals).support, ColorSupport::Extended);
    }

    #[rstest]
    #[case::announced("truecolor", ColorSupport::Truecolor)]
    #[case::bits("24bit", ColorSupport::Truecolor)]
    #[case::uppercase_ignored("TRUECOLOR", ColorSupport::None)]
    #[case::near_miss_ignored("24bits", ColorSupport::None)]
    fn colorterm_must_match_exactly(#[case] value: &str, #[case] expected: ColorSupport) {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_colorterm(value);
        assert_eq!(run(&console, &signals).support, expected);
    }

    #[test]
    fn rungs_only_ever_upgrade() {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new()
            .with_wrapper_active(true)
            .with_term("xterm-256color")
            .with_colorterm("truecolor");

        assert_eq!(run(&console, &signals).support, ColorSupport::Truecolor);
    }

    #[test]
    fn weaker_evidence_cannot_pull_a_vt_verdict_down() {
        let console = ScriptedConsole::new().with_vt_report(vt_ok());
        let signals = DetectionSignals::new()
            .with_build(19_041)
            .with_term("xterm")
            .with_wrapper_active(true);

        assert_eq!(run(&console, &signals).support, ColorSupport::Truecolor);
    }

    // ─── Palette banding ─────────────────────────────────────────

    #[test]
    fn remote_sessions_ignore_local_console_evidence() {
        let console = ScriptedConsole::new().with_vt_report(vt_ok());
        let signals = DetectionSignals::new()
            .with_build(19_041)
            .with_ssh_session(true);
        let detection = run(&console, &signals);

        assert_eq!(detection.support, ColorSupport::Truecolor);
        assert_eq!(detection.source, PaletteSource::SshFallback);
        assert_eq!(detection.palette, Some(&tables::XTERM));
    }

    #[rstest]
    #[case::early_build(1, PaletteSource::LegacyConsole)]
    #[case::last_legacy(16_299, PaletteSource::LegacyConsole)]
    #[case::first_refreshed(16_300, PaletteSource::ModernConsole)]
    fn host_build_bands_the_palette(#[case] build: u32, #[case] expected: PaletteSource) {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_term("xterm").with_build(build);
        let detection = run(&console, &signals);

        assert_eq!(detection.source, expected);
        let table = match expected {
            PaletteSource::ModernConsole => &tables::CONSOLE_MODERN,
            _ => &tables::CONSOLE_LEGACY,
        };
        assert_eq!(detection.palette, Some(table));
    }

    #[test]
    fn missing_host_version_means_standard_defaults() {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_term("xterm");
        let detection = run(&console, &signals);

        assert_eq!(detection.source, PaletteSource::DefaultFallback);
        assert_eq!(detection.palette, Some(&tables::XTERM));
    }

    #[test]
    fn explicit_palette_wins_over_banding() {
        let console = ScriptedConsole::new();
        let signals = DetectionSignals::new().with_term("xterm").with_build(19_041);
        let detection = Detector::new(&console)
            .with_palette(&tables::TANGO)
            .detect(&signals);

        assert_eq!(detection.source, PaletteSource::Explicit);
        assert_eq!(detection.palette, Some(&tables::TANGO));
        assert_eq!(detection.support, ColorSupport::Basic);
    }

    #[test]
    fn explicit_palette_is_ignored_without_color_support() {
        let console = ScriptedConsole::new();
        let detection = Detector::new(&console)
            .with_palette(&tables::TANGO)
            .detect(&DetectionSignals::new());

        assert_eq!(detection.support, ColorSupport::None);
        assert_eq!(detection.palette, None);
        assert_eq!(detection.source, PaletteSource::Unknown);
    }

    #[test]
    fn no_evidence_detects_nothing() {
        let console = ScriptedConsole::new();
        let detection = run(&console, &DetectionSignals::new());

        assert_eq!(detection.support, ColorSupport::None);
        assert_eq!(detection.palette, None);
        assert_eq!(detection.source, PaletteSource::Unknown);
        assert!(!detection.named_colors);
    }

    // ─── Named colors ────────────────────────────────────────────

    #[test]
    fn named_colors_need_truecolor_and_a_lookup() {
        let console = ScriptedConsole::new();
        let truecolor = DetectionSignals::new().with_colorterm("truecolor");
        let basic = DetectionSignals::new().with_term("xterm");
        let lookup = FixedLookup;

        let with_lookup = Detector::new(&console)
            .with_named_colors(&lookup)
            .detect(&truecolor);
        assert!(with_lookup.named_colors);

        let without_lookup = run(&console, &truecolor);
        assert!(!without_lookup.named_colors);

        let wrong_level = Detector::new(&console)
            .with_named_colors(&lookup)
            .detect(&basic);
        assert!(!wrong_level.named_colors);
    }

    #[test]
    fn lookup_resolves_known_names() {
        let lookup = FixedLookup;
        assert_eq!(lookup.rgb("red"), Some((255, 0, 0)));
        assert_eq!(lookup.rgb("heliotrope"), None);
    }

    // ─── Stability ───────────────────────────────────────────────

    #[test]
    fn repeat_detection_is_stable() {
        let report = VtReport {
            stdout: VtSwitch::AlreadyEnabled,
            stderr: VtSwitch::AlreadyEnabled,
        };
        let console = ScriptedConsole::new().with_vt_report(report);
        let signals = DetectionSignals::new().with_build(19_041);
        let detector = Detector::new(&console);

        let first = detector.detect(&signals);
        let second = detector.detect(&signals);
        assert_eq!(first, second);
        assert_eq!(first.support, ColorSupport::Truecolor);
    }
}
