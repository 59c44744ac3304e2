//! Block records: the command steps that make up a cobot program.
//!
//! A block is a typed command (`move`, `gripper`, `delay`) plus an opaque
//! JSON parameter payload. The editor never interprets the payload beyond
//! producing the short caption shown under a rendered block.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque parameter payload owned by the configuration collaborator.
pub type BlockParams = Map<String, Value>;

/// Stable identifier for blocks within one editor.
///
/// `0` is reserved so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(u64);

impl BlockId {
    /// Lowest valid block ID.
    pub const MIN: Self = Self(1);

    /// Create a block ID, rejecting 0.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Command types available in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    #[serde(alias = "mover")]
    Move,
    #[serde(alias = "garra")]
    Gripper,
    Delay,
}

impl CommandKind {
    /// All kinds in palette order.
    pub const ALL: [Self; 3] = [Self::Move, Self::Gripper, Self::Delay];

    /// Canonical marker written to program documents.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Gripper => "gripper",
            Self::Delay => "delay",
        }
    }

    /// Human-readable label for the rendered block.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::Gripper => "Gripper",
            Self::Delay => "Delay",
        }
    }

    /// Resolve a marker or label text to a kind.
    ///
    /// Matching is case-insensitive and by substring, so markers such as
    /// `"mover"` or label text such as `" Garra "` resolve too.
    #[must_use]
    pub fn from_marker(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        if text.contains("move") || text.contains("mover") {
            Some(Self::Move)
        } else if text.contains("gripper") || text.contains("garra") {
            Some(Self::Gripper)
        } else if text.contains("delay") {
            Some(Self::Delay)
        } else {
            None
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// One command step in the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub kind: CommandKind,
    pub params: BlockParams,
}

impl Block {
    /// Create a block.
    #[must_use]
    pub fn new(id: BlockId, kind: CommandKind, params: BlockParams) -> Self {
        Self { id, kind, params }
    }

    /// Short caption rendered under the block label.
    ///
    /// - move: the 1-based target point, zero padded to three digits
    /// - gripper: `Open` for action 0 (or no action yet), `Close` otherwise
    /// - delay: seconds with an `s` suffix
    ///
    /// Returns `None` when the payload lacks the field the caption needs.
    #[must_use]
    pub fn caption(&self) -> Option<String> {
        match self.kind {
            CommandKind::Move => {
                let point = self.params.get("point")?.as_i64()?;
                Some(format!("{:03}", point.saturating_add(1)))
            }
            CommandKind::Gripper => {
                let action = self
                    .params
                    .get("action")
                    .or_else(|| self.params.get("acao"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                Some(if action == 0 { "Open" } else { "Close" }.to_owned())
            }
            CommandKind::Delay => {
                let seconds = self.params.get("delay")?.as_f64()?;
                Some(format!("{seconds}s"))
            }
        }
    }
}

/// Palette entry carried by a drag from the palette.
///
/// Templates come from host markup and are not trusted to be well formed:
/// the marker may be missing, in which case the label text is used.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTemplate {
    /// Command-type marker (`data-command` on the palette element).
    pub marker: Option<String>,
    /// Visible label text of the palette entry.
    pub label: Option<String>,
    /// Preset parameters, if the palette entry carries any.
    pub params: Option<BlockParams>,
}

impl BlockTemplate {
    /// Template for a palette entry of a known kind.
    #[must_use]
    pub fn for_kind(kind: CommandKind) -> Self {
        Self {
            marker: Some(kind.marker().to_owned()),
            label: Some(kind.label().to_owned()),
            params: None,
        }
    }

    /// Normalize into a kind and a parameter object.
    ///
    /// Returns `None` only when neither marker nor label names a command.
    #[must_use]
    pub fn resolve(&self) -> Option<(CommandKind, BlockParams)> {
        let kind = self
            .marker
            .as_deref()
            .and_then(CommandKind::from_marker)
            .or_else(|| self.label.as_deref().and_then(CommandKind::from_marker))?;
        Some((kind, self.params.clone().unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockId, BlockParams, BlockTemplate, CommandKind};
    use serde_json::json;

    fn params(value: serde_json::Value) -> BlockParams {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn block_id_rejects_zero() {
        assert_eq!(BlockId::new(0), None);
        assert_eq!(BlockId::new(1), Some(BlockId::MIN));
        assert_eq!(BlockId::MIN.next().get(), 2);
    }

    #[test]
    fn kind_accepts_legacy_markers() {
        assert_eq!(CommandKind::from_marker("mover"), Some(CommandKind::Move));
        assert_eq!(CommandKind::from_marker(" Garra "), Some(CommandKind::Gripper));
        assert_eq!(CommandKind::from_marker("DELAY"), Some(CommandKind::Delay));
        assert_eq!(CommandKind::from_marker("weld"), None);
        assert_eq!(CommandKind::from_marker("  "), None);

        let kind: CommandKind = serde_json::from_str("\"garra\"").expect("alias");
        assert_eq!(kind, CommandKind::Gripper);
        assert_eq!(
            serde_json::to_string(&CommandKind::Gripper).expect("serialize"),
            "\"gripper\""
        );
    }

    #[test]
    fn template_falls_back_to_label() {
        let template = BlockTemplate {
            marker: None,
            label: Some("Delay".to_owned()),
            params: None,
        };
        let (kind, params) = template.resolve().expect("label resolves");
        assert_eq!(kind, CommandKind::Delay);
        assert!(params.is_empty());
    }

    #[test]
    fn unrecognizable_template_does_not_resolve() {
        let template = BlockTemplate {
            marker: Some("unknown".to_owned()),
            label: None,
            params: None,
        };
        assert_eq!(template.resolve(), None);
        assert_eq!(BlockTemplate::default().resolve(), None);
    }

    #[test]
    fn captions_follow_payload() {
        let id = BlockId::MIN;
        let mv = Block::new(id, CommandKind::Move, params(json!({"point": 4, "mode": "Linear"})));
        assert_eq!(mv.caption().as_deref(), Some("005"));

        let open = Block::new(id, CommandKind::Gripper, BlockParams::new());
        assert_eq!(open.caption().as_deref(), Some("Open"));
        let close = Block::new(id, CommandKind::Gripper, params(json!({"acao": 1})));
        assert_eq!(close.caption().as_deref(), Some("Close"));

        let delay = Block::new(id, CommandKind::Delay, params(json!({"delay": 1.5})));
        assert_eq!(delay.caption().as_deref(), Some("1.5s"));

        let unset = Block::new(id, CommandKind::Move, BlockParams::new());
        assert_eq!(unset.caption(), None);
    }
}
