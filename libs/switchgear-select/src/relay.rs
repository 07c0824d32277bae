//! Overload relay matching

use serde::{Deserialize, Serialize};
use switchgear_model::OverloadRelay;

/// Margin applied either side of FLC for the preferred match
pub const RELAY_MARGIN: f64 = 0.2;

/// How an overload relay was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayMatchQuality {
    /// Range covers FLC ±20% and fits the contactor frame
    MarginBand,
    /// Range covers FLC only; frame compatibility not checked
    PointOnly,
}

/// Matched relay with its quality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelayMatch<'a> {
    pub relay: &'a OverloadRelay,
    pub quality: RelayMatchQuality,
}

/// Cheapest overload relay for a motor current and contactor frame
///
/// Preferred: range covers `[flc×0.8, flc×1.2]` and the relay fits
/// `frame_size` (an empty frame list fits any frame). Fallback, only when
/// nothing is preferred: range covers `flc`, frame ignored. Price ties keep
/// catalog order.
pub fn select_overload_relay<'a>(
    relays: &'a [OverloadRelay],
    flc: f64,
    frame_size: Option<&str>,
) -> Option<RelayMatch<'a>> {
    let low = flc * (1.0 - RELAY_MARGIN);
    let high = flc * (1.0 + RELAY_MARGIN);

    let preferred = cheapest(
        relays
            .iter()
            .filter(|r| r.covers_band(low, high) && r.fits_frame(frame_size)),
    );
    if let Some(relay) = preferred {
        return Some(RelayMatch {
            relay,
            quality: RelayMatchQuality::MarginBand,
        });
    }

    cheapest(relays.iter().filter(|r| r.covers_point(flc))).map(|relay| {
        tracing::debug!(
            flc = flc,
            relay = %relay.model,
            "No relay covers the margin band, using point match"
        );
        RelayMatch {
            relay,
            quality: RelayMatchQuality::PointOnly,
        }
    })
}

fn cheapest<'a>(relays: impl Iterator<Item = &'a OverloadRelay>) -> Option<&'a OverloadRelay> {
    relays.min_by(|a, b| a.price.total_cmp(&b.price))
}
