//! Responsive expansion.
//!
//! A responsive field carries one value per breakpoint, widest first. The
//! widest value becomes the base rule. Walking towards narrower breakpoints,
//! each value that differs from its immediately wider neighbour yields a
//! `max-width` override holding only the declarations that changed.
//! Overrides come out in narrowing order, so the narrowest matching block is
//! last and wins under the normal cascade.

use crate::types::{Breakpoint, Declaration, ResolvedValue};

/// A field's value and declarations at one breakpoint.
#[derive(Debug, Clone)]
pub struct Layer<'a> {
    pub breakpoint: &'a Breakpoint,
    pub value: &'a ResolvedValue,
    pub declarations: Vec<Declaration>,
}

/// Declarations scoped to one narrower breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub breakpoint: String,
    pub max_width: u32,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub base: Vec<Declaration>,
    pub overrides: Vec<Override>,
}

/// Expands per-breakpoint layers, given widest first.
pub fn expand(layers: Vec<Layer<'_>>) -> Expansion {
    let mut expansion = Expansion::default();
    let mut layers = layers.into_iter();
    let Some(widest) = layers.next() else {
        return expansion;
    };

    let mut wider = widest.clone();
    expansion.base = widest.declarations;

    for layer in layers {
        if layer.value == wider.value {
            wider = layer;
            continue;
        }
        let Some(max_width) = layer.breakpoint.max else {
            log::debug!(
                "breakpoint `{}` has no max width; skipping override",
                layer.breakpoint.name
            );
            wider = layer;
            continue;
        };

        let delta: Vec<Declaration> = layer
            .declarations
            .iter()
            .filter(|d| !wider.declarations.contains(d))
            .cloned()
            .collect();
        if !delta.is_empty() {
            expansion.overrides.push(Override {
                breakpoint: layer.breakpoint.name.clone(),
                max_width,
                declarations: delta,
            });
        }
        wider = layer;
    }
    expansion
}
