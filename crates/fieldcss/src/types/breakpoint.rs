//! Breakpoint configuration.
//!
//! Breakpoints are named viewport ranges. Their ordering decides both which
//! value becomes the base rule (the widest breakpoint) and the order in
//! which media-query overrides are emitted (narrowing, so that later blocks
//! win under the normal cascade).
//!
//! The default set:
//!
//! | Name     | Range        | Emitted as                   |
//! |----------|--------------|------------------------------|
//! | `wide`   | `>= 1024px`  | base rule                    |
//! | `medium` | `768-1023px` | `@media (max-width: 1023px)` |
//! | `narrow` | `<= 767px`   | `@media (max-width: 767px)`  |

use crate::FieldCssError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named viewport-width range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl Breakpoint {
    pub fn new(name: &str, min: Option<u32>, max: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
        }
    }
}

/// A validated, ordered breakpoint set (widest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct Breakpoints {
    ordered: Vec<Breakpoint>,
}

impl Breakpoints {
    /// Validates and orders a breakpoint list.
    ///
    /// The list must be non-empty, use unique names, contain exactly one
    /// breakpoint without a `max` (the widest), and use distinct `max`
    /// values. Input order does not matter.
    pub fn new(list: Vec<Breakpoint>) -> Result<Self, FieldCssError> {
        if list.is_empty() {
            return Err(FieldCssError::InvalidConfig(
                "at least one breakpoint is required".into(),
            ));
        }

        let mut names = HashSet::new();
        let mut maxima = HashSet::new();
        for bp in &list {
            if bp.name.trim().is_empty() {
                return Err(FieldCssError::InvalidConfig("breakpoint name is empty".into()));
            }
            if !names.insert(bp.name.as_str()) {
                return Err(FieldCssError::InvalidConfig(format!(
                    "breakpoint `{}` is defined twice",
                    bp.name
                )));
            }
            if !maxima.insert(bp.max) {
                return Err(FieldCssError::InvalidConfig(match bp.max {
                    Some(max) => format!("two breakpoints share max width {max}px"),
                    None => "exactly one breakpoint may omit `max`".into(),
                }));
            }
            if let (Some(min), Some(max)) = (bp.min, bp.max) {
                if min > max {
                    return Err(FieldCssError::InvalidConfig(format!(
                        "breakpoint `{}` has min {min} above max {max}",
                        bp.name
                    )));
                }
            }
        }
        if !maxima.contains(&None) {
            return Err(FieldCssError::InvalidConfig(
                "the widest breakpoint must omit `max`".into(),
            ));
        }

        let mut ordered = list;
        // None (unbounded) sorts first, then descending max width.
        ordered.sort_by(|a, b| match (a.max, b.max) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => y.cmp(&x),
        });
        Ok(Self { ordered })
    }

    /// The breakpoint whose values form the base rule.
    pub fn widest(&self) -> &Breakpoint {
        &self.ordered[0]
    }

    /// Breakpoints widest first.
    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.ordered.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Breakpoint> {
        self.ordered.get(index)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ordered.iter().any(|bp| bp.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.ordered.iter().position(|bp| bp.name == name)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            ordered: vec![
                Breakpoint::new("wide", Some(1024), None),
                Breakpoint::new("medium", Some(768), Some(1023)),
                Breakpoint::new("narrow", None, Some(767)),
            ],
        }
    }
}

impl TryFrom<Vec<Breakpoint>> for Breakpoints {
    type Error = FieldCssError;

    fn try_from(list: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        Self::new(list)
    }
}

impl From<Breakpoints> for Vec<Breakpoint> {
    fn from(breakpoints: Breakpoints) -> Self {
        breakpoints.ordered
    }
}
