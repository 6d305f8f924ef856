//! # Decode Replay
//!
//! Mirrors the encode simulator's inverse-match traversal (spec.md §4.7):
//! the same backward pattern, over the same bytes (`data` here is exactly
//! the `intermediate` the encoder produced), yields the identical sequence
//! of match spans - that is the whole reason bits line up positionally
//! without either side needing to exchange position information. Each
//! retained match consumes one bit from the flag source and either emits
//! the matched bytes' pre-image or is skipped, its bytes left to be copied
//! in a later gap.

use crate::error::Result;
use crate::flagstream::{FlagSource, MatchContext};
use crate::matcher::{self, EncodedBytes};
use crate::stage::CompiledStage;

/// Replays `stage`'s inverse substitution over `data`, consuming one bit per
/// retained match from `source`. Returns the reconstructed bytes and a count
/// of decisions defaulted to `0` because the flag source ran out early
/// (spec.md §4.11/§7: non-fatal, but the caller should log it - the decode
/// succeeded but may no longer reconstruct the original exactly).
pub fn replay<S: FlagSource>(data: &[u8], stage: &CompiledStage, source: &mut S) -> Result<(Vec<u8>, usize)> {
    let enc = EncodedBytes::new(data);
    let spans = matcher::match_spans(stage.backward_pattern(), &enc)?;

    let mut out = Vec::with_capacity(data.len());
    let mut last_end = 0usize;
    // Mirrors the encode simulator's skip-cursor (spec.md §9 Open Question):
    // kept even though a single static, non-overlapping span list can never
    // actually trigger it, so a future relaxation of the matcher cannot
    // silently reintroduce double-counted matches.
    let mut seen_until = 0usize;
    let mut eof_count = 0usize;

    for (pos, end) in spans {
        if pos < seen_until {
            continue;
        }

        let ctx = MatchContext::around(data, pos, end);
        let bit = match source.read(ctx) {
            Ok(Some(bit)) => bit,
            Ok(None) => {
                eof_count += 1;
                false
            }
            Err(e) => return Err(crate::error::ReplError::io(e.to_string())),
        };

        if bit {
            out.extend_from_slice(&data[last_end..pos]);
            let matched = &data[pos..end];
            let preimage = stage.inverse_map().get(matched).map(|v| v.as_slice()).unwrap_or(matched);
            out.extend_from_slice(preimage);
            last_end = end;
            seen_until = end;
        }
        // bit == 0: leave `matched` untouched; its bytes are copied by a
        // later (or the trailing) gap, since `last_end` did not advance.
    }
    out.extend_from_slice(&data[last_end..]);

    Ok((out, eof_count))
}
