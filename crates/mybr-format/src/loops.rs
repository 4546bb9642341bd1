//! Loop metadata — the loop points stored in the global header and the
//! policies that derive them from caller input.
//!
//! Loop points are sample-frame offsets into track 0, the container's
//! reference track. Every other track is free to have a different length or
//! sample rate; the loop is only meaningful against track 0.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ways a stored or derived loop can violate the format invariant
/// `start < end <= track0.num_samples`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopViolation {
    #[error("loop start {start_sample} is not before loop end {end_sample}")]
    StartNotBeforeEnd { start_sample: u32, end_sample: u32 },

    #[error("loop end {end_sample} exceeds the {track_frames} frames of track 0")]
    EndPastReferenceTrack { end_sample: u64, track_frames: u32 },

    #[error("loop-enabled flag byte is {0:#04x}, expected 0 or 1")]
    BadFlagByte(u8),
}

/// Loop points carried in the global header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopSpec {
    /// Whether loop playback is requested for this container.
    pub enabled: bool,
    /// First frame of the repeatable segment, relative to track 0.
    pub start_sample: u32,
    /// End frame of the repeatable segment (exclusive), relative to track 0.
    pub end_sample: u32,
}

impl LoopSpec {
    /// An enabled loop over the given frame range.
    pub fn new(start_sample: u32, end_sample: u32) -> Self {
        Self {
            enabled: true,
            start_sample,
            end_sample,
        }
    }

    /// A disabled loop; start and end are serialized as zero.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_sample: 0,
            end_sample: 0,
        }
    }

    /// Check the loop bounds against the reference track's frame count.
    ///
    /// Disabled specs always pass.
    pub fn validate(&self, track_frames: u32) -> Result<(), LoopViolation> {
        if !self.enabled {
            return Ok(());
        }
        if self.start_sample >= self.end_sample {
            return Err(LoopViolation::StartNotBeforeEnd {
                start_sample: self.start_sample,
                end_sample: self.end_sample,
            });
        }
        if self.end_sample > track_frames {
            return Err(LoopViolation::EndPastReferenceTrack {
                end_sample: self.end_sample as u64,
                track_frames,
            });
        }
        Ok(())
    }
}

impl Default for LoopSpec {
    fn default() -> Self {
        Self::disabled()
    }
}

/// How the encoder obtains its [`LoopSpec`]. Exactly one mode is active per
/// encode; there is no implicit fallback between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMode {
    /// No loop points are written.
    Disabled,
    /// Caller supplies both frame offsets directly.
    Manual { start_sample: u32, end_sample: u32 },
    /// Derived from two reference streams: start is the frame count of the
    /// start reference, end is the frame count of the end reference.
    ReferenceAbsolute {
        start_ref_frames: u32,
        end_ref_frames: u32,
    },
    /// Derived from an intro stream and a segment stream: start is the intro
    /// frame count, end is start plus the segment frame count.
    ReferenceSegment {
        intro_frames: u32,
        segment_frames: u32,
    },
}

impl LoopMode {
    /// Resolve the mode to concrete loop points and check them against the
    /// reference track's frame count.
    pub fn resolve(&self, track_frames: u32) -> Result<LoopSpec, LoopViolation> {
        let spec = match *self {
            LoopMode::Disabled => LoopSpec::disabled(),
            LoopMode::Manual {
                start_sample,
                end_sample,
            } => LoopSpec::new(start_sample, end_sample),
            LoopMode::ReferenceAbsolute {
                start_ref_frames,
                end_ref_frames,
            } => LoopSpec::new(start_ref_frames, end_ref_frames),
            LoopMode::ReferenceSegment {
                intro_frames,
                segment_frames,
            } => {
                // Computed in u64: an end past u32::MAX can never satisfy
                // end <= track_frames, so report it before truncation could
                // hide the overflow.
                let end = intro_frames as u64 + segment_frames as u64;
                if end > track_frames as u64 {
                    return Err(LoopViolation::EndPastReferenceTrack {
                        end_sample: end,
                        track_frames,
                    });
                }
                LoopSpec::new(intro_frames, end as u32)
            }
        };
        spec.validate(track_frames)?;
        Ok(spec)
    }
}

/// Loop metadata as recovered by the decoder.
///
/// An invalid loop does not fail the decode; the tracks remain readable and
/// only the loop fields are untrustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopMetadata {
    /// No loop stored.
    Disabled,
    /// Loop stored and consistent with track 0.
    Enabled(LoopSpec),
    /// Loop stored but inconsistent; kept for diagnostics.
    Invalid {
        start_sample: u32,
        end_sample: u32,
        violation: LoopViolation,
    },
}

impl LoopMetadata {
    /// True unless the stored loop failed validation.
    pub fn is_valid(&self) -> bool {
        !matches!(self, LoopMetadata::Invalid { .. })
    }

    /// The validated loop spec, if one is present and enabled.
    pub fn spec(&self) -> Option<LoopSpec> {
        match self {
            LoopMetadata::Enabled(spec) => Some(*spec),
            _ => None,
        }
    }
}
