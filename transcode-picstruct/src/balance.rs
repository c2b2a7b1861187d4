//! Field parity balancing for field-based patterns.
//!
//! A 3-field structure leaves the field parity flipped. When it is directly
//! followed by a progressive-class frame, which carries no parity, the odd
//! field count is never paired off. The balancer moves that progressive
//! frame behind the next occurrence of the same 3-field structure and puts
//! the complementary 3-field structure in its place, so the two repeats
//! cancel before the parity-less frame is shown.

use crate::picstruct::PicStruct;
use tracing::{trace, warn};

/// Rewrite `pattern` in place so that no 3-field structure is immediately
/// followed by a progressive-class frame, where a later occurrence of the
/// same 3-field structure makes that possible.
///
/// Returns the number of relocations performed. Length and the count of
/// every non 3-field structure are preserved.
pub fn balance_field_pattern(pattern: &mut [PicStruct]) -> usize {
    let mut relocations = 0;
    let mut k = 0;

    while k + 1 < pattern.len() {
        let current = pattern[k];
        let complement = match current.complement() {
            Some(complement) => complement,
            None => {
                k += 1;
                continue;
            }
        };

        // Only a parity-less successor is a hazard.
        if !pattern[k + 1].is_progressive() {
            k += 1;
            continue;
        }

        match pattern[k + 1..].iter().position(|&c| c == current) {
            Some(offset) => {
                let pair = k + 1 + offset;
                let moved = pattern[k + 1];
                trace!(from = k + 1, to = pair, code = %moved, "relocating progressive frame");
                pattern[pair] = moved;
                pattern[k + 1] = complement;
                relocations += 1;
                // The moved frame may now follow another 3-field structure.
                k = pair;
            }
            None => {
                warn!(index = k, code = %current, "unbalanced 3-field structure left in pattern");
                k += 1;
            }
        }
    }

    relocations
}
