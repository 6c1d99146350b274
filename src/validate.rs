//! Hardware placement constraints for screens
//!
//! The console can hold a fixed number of sprites and only draws a limited
//! number of them on any one scanline. [`validate`] checks a candidate
//! [`Screen`] against both rules and reports every breach at once.

use crate::screen::Screen;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a sprite's rows are counted against the per-scanline limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanlinePolicy {
    /// Clamp the sprite's vertical span into the screen, so a sprite above
    /// or below the screen still counts against the edge row.
    #[default]
    Clamp,
    /// Count only rows the sprite actually covers on screen.
    Visible,
}

impl fmt::Display for ScanlinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanlinePolicy::Clamp => write!(f, "clamp"),
            ScanlinePolicy::Visible => write!(f, "visible"),
        }
    }
}

impl FromStr for ScanlinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clamp" => Ok(ScanlinePolicy::Clamp),
            "visible" => Ok(ScanlinePolicy::Visible),
            other => Err(format!("unknown scanline policy '{}' (expected clamp or visible)", other)),
        }
    }
}

/// Caps enforced on every screen mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareLimits {
    pub max_sprites: usize,
    pub max_sprites_per_scanline: usize,
    /// Offending rows listed in one scanline message
    pub max_reported_rows: usize,
    pub scanline_policy: ScanlinePolicy,
}

impl Default for HardwareLimits {
    fn default() -> Self {
        Self {
            max_sprites: 64,
            max_sprites_per_scanline: 8,
            max_reported_rows: 10,
            scanline_policy: ScanlinePolicy::Clamp,
        }
    }
}

/// One broken placement rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// More sprites than the hardware holds
    #[error(
        "too many sprites: {actual}/{allowed} placed, only {allowed} fit ({allowed}/{allowed} slots in use)"
    )]
    Capacity { actual: usize, allowed: usize },
    /// Some rows are covered by too many sprites. `rows` is truncated to
    /// the reporting limit; `total_rows` is the full count.
    #[error("more than {allowed} sprites on scanline(s) {}", row_list(.rows, *.total_rows))]
    Scanline { rows: Vec<usize>, total_rows: usize, allowed: usize },
}

/// `r1, r2, r3` plus ` and K more` when the list was cut short.
fn row_list(rows: &[usize], total_rows: usize) -> String {
    let listed: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
    let mut out = listed.join(", ");
    if total_rows > rows.len() {
        out.push_str(&format!(" and {} more", total_rows - rows.len()));
    }
    out
}

impl Violation {
    /// Short machine-friendly name of the rule.
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::Capacity { .. } => "capacity",
            Violation::Scanline { .. } => "scanline",
        }
    }
}

/// Rejected screen: every rule the candidate breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("placement rejected:\n{}", bullet_list(.0))]
pub struct PlacementViolation(pub Vec<Violation>);

fn bullet_list(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("  - {}\n", v)).collect()
}

impl PlacementViolation {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|v| v.to_string()).collect()
    }
}

/// Number of sprites counted on each screen row.
///
/// Sprites with no visible rows are skipped under
/// [`ScanlinePolicy::Visible`]; under [`ScanlinePolicy::Clamp`] both ends
/// of the sprite's span are clamped into the screen first.
pub fn scanline_counts(screen: &Screen, limits: &HardwareLimits) -> Vec<usize> {
    let height = screen.height() as i64;
    let mut counts = vec![0usize; height.max(0) as usize];
    if height <= 0 {
        return counts;
    }

    for sprite in screen.sprites() {
        let top = sprite.y as i64;
        let bottom = top + sprite.tile.height() as i64 - 1;
        let (first, last) = match limits.scanline_policy {
            ScanlinePolicy::Clamp => (top.clamp(0, height - 1), bottom.clamp(0, height - 1)),
            ScanlinePolicy::Visible => {
                if bottom < 0 || top >= height {
                    continue;
                }
                (top.max(0), bottom.min(height - 1))
            }
        };
        for row in first..=last {
            counts[row as usize] += 1;
        }
    }
    counts
}

/// Check a screen against the hardware caps.
///
/// ```
/// use chrsmith::screen::Screen;
/// use chrsmith::validate::{validate, HardwareLimits};
///
/// assert!(validate(&Screen::new(), &HardwareLimits::default()).is_ok());
/// ```
pub fn validate(screen: &Screen, limits: &HardwareLimits) -> Result<(), PlacementViolation> {
    let mut violations = Vec::new();

    let count = screen.sprites().len();
    if count > limits.max_sprites {
        violations.push(Violation::Capacity { actual: count, allowed: limits.max_sprites });
    }

    let crowded: Vec<usize> = scanline_counts(screen, limits)
        .iter()
        .enumerate()
        .filter(|(_, &n)| n > limits.max_sprites_per_scanline)
        .map(|(row, _)| row)
        .collect();
    if !crowded.is_empty() {
        violations.push(Violation::Scanline {
            rows: crowded.iter().copied().take(limits.max_reported_rows).collect(),
            total_rows: crowded.len(),
            allowed: limits.max_sprites_per_scanline,
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PlacementViolation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteIndex;
    use crate::screen::SpriteInstance;
    use crate::tile::Tile;

    fn sprite_at(index: usize, x: i32, y: i32, height: u32) -> SpriteInstance {
        SpriteInstance::new(index, x, y, Tile::new(8, height, PaletteIndex::default()).unwrap())
    }

    fn screen_with(sprites: Vec<SpriteInstance>) -> Screen {
        Screen::new().with_sprites_unchecked(sprites)
    }

    #[test]
    fn test_empty_screen_is_valid() {
        assert!(validate(&Screen::new(), &HardwareLimits::default()).is_ok());
    }

    #[test]
    fn test_eight_per_line_is_fine() {
        let sprites = (0..8).map(|i| sprite_at(i, i as i32 * 8, 0, 8)).collect();
        assert!(validate(&screen_with(sprites), &HardwareLimits::default()).is_ok());
    }

    #[test]
    fn test_ninth_sprite_on_row_zero() {
        let sprites = (0..9).map(|i| sprite_at(i, i as i32 * 8, 0, 8)).collect();
        let err = validate(&screen_with(sprites), &HardwareLimits::default()).unwrap_err();

        assert_eq!(err.violations().len(), 1);
        match &err.violations()[0] {
            Violation::Scanline { rows, total_rows, allowed } => {
                assert_eq!(rows[0], 0);
                assert_eq!(rows.len(), 8);
                assert_eq!(*total_rows, 8);
                assert_eq!(*allowed, 8);
            }
            other => panic!("unexpected violation: {:?}", other),
        }
        assert!(err.to_string().contains("scanline(s) 0, 1"));
    }

    #[test]
    fn test_capacity_message_cites_full() {
        // Spread vertically so only capacity is broken
        let sprites = (0..65).map(|i| sprite_at(i % 64, 0, (i as i32 % 30) * 8, 8)).collect();
        let err = validate(&screen_with(sprites), &HardwareLimits::default()).unwrap_err();

        let capacity: Vec<_> = err.violations().iter().filter(|v| v.kind() == "capacity").collect();
        assert_eq!(capacity.len(), 1);
        let msg = capacity[0].to_string();
        assert!(msg.contains("64/64"), "{}", msg);
        assert!(msg.contains("65/64 placed"), "{}", msg);
    }

    #[test]
    fn test_rejection_lists_every_violation() {
        let err = PlacementViolation(vec![
            Violation::Capacity { actual: 3, allowed: 2 },
            Violation::Scanline { rows: vec![4, 5], total_rows: 7, allowed: 1 },
        ]);
        assert_eq!(
            err.to_string(),
            "placement rejected:\n  \
             - too many sprites: 3/2 placed, only 2 fit (2/2 slots in use)\n  \
             - more than 1 sprites on scanline(s) 4, 5 and 5 more\n"
        );
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_reported_rows_are_bounded() {
        let sprites = (0..9).map(|i| sprite_at(i, 0, 0, 64)).collect();
        let err = validate(&screen_with(sprites), &HardwareLimits::default()).unwrap_err();
        match &err.violations()[0] {
            Violation::Scanline { rows, total_rows, .. } => {
                assert_eq!(rows.len(), 10);
                assert_eq!(*total_rows, 64);
            }
            other => panic!("unexpected violation: {:?}", other),
        }
        assert!(err.to_string().contains("and 54 more"));
    }

    #[test]
    fn test_clamp_counts_offscreen_sprites_on_edge_rows() {
        let sprites = vec![sprite_at(0, 0, -40, 8), sprite_at(1, 0, 300, 8)];
        let counts = scanline_counts(&screen_with(sprites), &HardwareLimits::default());
        assert_eq!(counts[0], 1);
        assert_eq!(counts[239], 1);
    }

    #[test]
    fn test_visible_policy_skips_offscreen_rows() {
        let limits = HardwareLimits { scanline_policy: ScanlinePolicy::Visible, ..Default::default() };
        let sprites = vec![sprite_at(0, 0, -40, 8), sprite_at(1, 0, -4, 8)];
        let counts = scanline_counts(&screen_with(sprites), &limits);
        assert_eq!(&counts[0..5], &[1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_scanline_policy_parse() {
        assert_eq!("visible".parse::<ScanlinePolicy>().unwrap(), ScanlinePolicy::Visible);
        assert_eq!(ScanlinePolicy::Clamp.to_string(), "clamp");
        assert!("sometimes".parse::<ScanlinePolicy>().is_err());
    }
}
