// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

/// Steepness used when a configuration does not specify one.
pub const DEFAULT_ALPHA: f64 = 50.0;

/// Sigmoidal neuron response `0.5 * (1 + tanh(alpha * u))`.
///
/// The output lies in `(0, 1)`, passes through `0.5` at `u = 0` and grows
/// monotonically with `u`. Larger `alpha` sharpens the transition towards a
/// unit step. In `f64` the result saturates to exactly `0.0` or `1.0` once
/// `|alpha * u|` is beyond roughly 19, which is what allows relaxed
/// networks to land on exact permutation matrices.
#[inline]
pub fn activation(u: f64, alpha: f64) -> f64 {
    0.5 * (1.0 + (alpha * u).tanh())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = f64> {
        (-30..=30).map(|step| step as f64 * 0.01)
    }

    #[test]
    fn output_stays_inside_open_unit_interval() {
        for alpha in [0.5, 1.0, 10.0, DEFAULT_ALPHA] {
            for u in grid() {
                let y = activation(u, alpha);
                assert!(y > 0.0 && y < 1.0, "activation({u}, {alpha}) = {y}");
            }
        }
    }

    #[test]
    fn midpoint_is_one_half() {
        for alpha in [0.1, 1.0, DEFAULT_ALPHA, 1e6] {
            assert_eq!(activation(0.0, alpha), 0.5);
        }
    }

    #[test]
    fn strictly_increasing_in_potential() {
        let values: Vec<f64> = grid().map(|u| activation(u, DEFAULT_ALPHA)).collect();
        for pair in values.windows(2) {
            assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn larger_alpha_sharpens_decisions() {
        for u in [-0.02, -0.005, 0.001, 0.01, 0.03] {
            let soft = (activation(u, 5.0) - 0.5).abs();
            let sharp = (activation(u, 50.0) - 0.5).abs();
            assert!(sharp > soft, "u={u}: {sharp} <= {soft}");
        }
    }

    #[test]
    fn saturates_to_exact_binary_values() {
        assert_eq!(activation(1.0, DEFAULT_ALPHA), 1.0);
        assert_eq!(activation(-1.0, DEFAULT_ALPHA), 0.0);
    }
}
