#[cfg(test)]
mod tests {
    use super::super::models::{ConcentrationModel, EvaluationPolicy, ProblemParameters};
    use super::super::series_2d::*;
    use crate::Numerical::quadrature::{QuadratureSettings, integrate};
    use crate::errors::{HenryError, Phase};
    use approx::assert_relative_eq;

    fn model() -> SeriesModel2D {
        // Dg = 1, Dl = 4, R0 = 1, He = 2, c0 = 1
        SeriesModel2D::new(ProblemParameters::new(1.0, 4.0, 1.0, 2.0, 1.0).unwrap()).unwrap()
    }

    struct ZeroPair;
    impl SpectralPair for ZeroPair {
        fn phi(&self, _u: f64) -> f64 {
            0.0
        }
        fn psi(&self, _u: f64) -> f64 {
            0.0
        }
    }

    /// Φ² is subnormal, so the quotients overflow
    struct TinyPair;
    impl SpectralPair for TinyPair {
        fn phi(&self, _u: f64) -> f64 {
            1e-160
        }
        fn psi(&self, _u: f64) -> f64 {
            0.0
        }
    }

    struct NanPair;
    impl SpectralPair for NanPair {
        fn phi(&self, _u: f64) -> f64 {
            f64::NAN
        }
        fn psi(&self, _u: f64) -> f64 {
            1.0
        }
    }

    #[test]
    fn test_gas_reference_values() {
        let m = model();
        let cases = [
            (0.5, 1.0, 0.0427334845),
            (0.5, 1.2, 0.0323412941),
            (0.5, 0.25, 0.3434036786),
            (0.5, 4.0, 0.0079261188),
            (1e-3, 1.0, 0.0477290586),
        ];
        for (r, t, expected) in cases {
            let cg = m.gas_concentration(r, t).unwrap();
            assert!(cg.converged);
            assert_eq!(cg.degenerate_samples, 0);
            assert!(cg.relative_error() < 5e-3);
            assert_relative_eq!(cg.value, expected, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_liquid_reference_values() {
        let m = model();
        let cl = m.liquid_concentration(1.5, 1.2).unwrap();
        assert!(cl.converged);
        assert_relative_eq!(cl.value, 0.0476432564, max_relative = 1e-4);
        let cl = m.liquid_concentration(2.0, 1.0).unwrap();
        assert_relative_eq!(cl.value, 0.0505964597, max_relative = 1e-4);
    }

    #[test]
    fn test_interface_partition() {
        let m = model();
        let cg = m.gas_concentration(1.0, 1.0).unwrap().value;
        let cl = m.liquid_concentration(1.0, 1.0).unwrap().value;
        assert_relative_eq!(cg, 0.0304991365, max_relative = 1e-4);
        assert_relative_eq!(cl, 0.0609982730, max_relative = 1e-4);
        assert_relative_eq!(cl / cg, 2.0, max_relative = 1e-4);
    }

    #[test]
    fn test_gas_decays_with_time() {
        let m = model();
        let values: Vec<f64> = [0.25, 1.0, 4.0]
            .iter()
            .map(|&t| m.gas_concentration(0.5, t).unwrap().value)
            .collect();
        assert!(values[0] > values[1]);
        assert!(values[1] > values[2]);
        assert!(values[2] > 0.0);
    }

    #[test]
    fn test_truncation_bound() {
        let m = model();
        assert_relative_eq!(m.truncation_bound(0.25).unwrap(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(m.truncation_bound(4.0).unwrap(), 2.5, epsilon = 1e-12);
        assert!(m.truncation_bound(0.0).is_err());
        let cg = m.gas_concentration(0.5, 0.25).unwrap();
        assert_relative_eq!(cg.upper_bound, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_denominator_contributes_nothing() {
        let integrand = GasSeriesIntegrand::new(&ZeroPair, 1.0, 1.0, 0.5, 1.0);
        let res = integrate(
            |u| integrand.eval(u),
            0.0,
            5.0,
            &QuadratureSettings::series_default(),
        )
        .unwrap();
        assert_eq!(res.value, 0.0);
        assert!(res.converged);
        assert_eq!(integrand.degenerate_samples(), res.evaluations);

        let params = ProblemParameters::new(1.0, 4.0, 1.0, 2.0, 1.0).unwrap();
        let liquid = LiquidSeriesIntegrand::new(&ZeroPair, &params, 1.5, 1.0);
        assert_eq!(liquid.eval(0.7), 0.0);
        assert_eq!(liquid.degenerate_samples(), 1);
    }

    #[test]
    fn test_overflowing_quotient_is_degenerate() {
        let gas = GasSeriesIntegrand::new(&TinyPair, 1.0, 1.0, 0.5, 1.0);
        assert_eq!(gas.eval(1.0), 0.0);
        assert_eq!(gas.degenerate_samples(), 1);

        // exp(-u²)·J0(u/2)·J1(u) > 0.08 on [0.5, 1]: every node overflows
        let res = integrate(
            |u| gas.eval(u),
            0.5,
            1.0,
            &QuadratureSettings::series_default(),
        )
        .unwrap();
        assert_eq!(res.value, 0.0);
        assert!(res.converged);
        assert_eq!(gas.degenerate_samples(), 1 + res.evaluations);

        let params = ProblemParameters::new(1.0, 4.0, 1.0, 2.0, 1.0).unwrap();
        let liquid = LiquidSeriesIntegrand::new(&NanPair, &params, 1.5, 1.0);
        assert_eq!(liquid.eval(1.0), 0.0);
        assert_eq!(liquid.degenerate_samples(), 1);
    }

    #[test]
    fn test_spectral_pair_nonzero_on_axis() {
        let m = model();
        let pair = m.pair();
        for k in 1..200 {
            let u = 0.05 * k as f64;
            let d = pair.phi(u).powi(2) + pair.psi(u).powi(2);
            assert!(d > 0.0, "Φ²+Ψ² vanished at u = {}", u);
        }
    }

    #[test]
    fn test_domain_errors() {
        let m = model();
        assert!(matches!(
            m.gas_concentration(1.5, 1.0),
            Err(HenryError::OutOfDomain {
                phase: Phase::Gas,
                ..
            })
        ));
        assert!(matches!(
            m.liquid_concentration(0.5, 1.0),
            Err(HenryError::OutOfDomain {
                phase: Phase::Liquid,
                ..
            })
        ));
        // r = 0 is excluded from the gas domain and reported as such
        let at_centre = m.gas_concentration(0.0, 1.0).unwrap_err();
        assert!(matches!(
            at_centre,
            HenryError::OutOfDomain {
                lower_open: true,
                ..
            }
        ));
        assert_eq!(
            at_centre.to_string(),
            "Coordinate 0 is outside the gas domain (0, 1]"
        );
        assert_eq!(
            m.liquid_concentration(0.5, 1.0).unwrap_err().to_string(),
            "Coordinate 0.5 is outside the liquid domain [1, inf)"
        );
        assert!(m.gas_concentration(0.5, 0.0).is_err());
        assert!(m.liquid_concentration(1.5, -1.0).is_err());
        assert!(m.liquid_concentration(f64::NAN, 1.0).is_err());
        assert!(SeriesModel2D::new(ProblemParameters {
            dg: 1.0,
            dl: -4.0,
            r0: 1.0,
            henry: 2.0,
            c0: 1.0
        })
        .is_err());
    }

    #[test]
    fn test_policy_on_capped_quadrature() {
        let settings = QuadratureSettings::series_default()
            .with_tolerances(1e-15, 1e-15)
            .with_max_subdivisions(1);
        let lenient = model().with_quadrature(settings.clone());
        let cg = lenient.gas_concentration(0.5, 0.25).unwrap();
        assert!(!cg.converged);
        assert_eq!(cg.subdivisions, 1);
        assert!(cg.value.is_finite());

        let strict = model()
            .with_quadrature(settings)
            .with_policy(EvaluationPolicy::Strict);
        assert!(matches!(
            strict.gas_concentration(0.5, 0.25),
            Err(HenryError::NonConvergence { .. })
        ));
    }

    #[test]
    fn test_compute_grids() {
        let m = model();
        let times = [0.25, 1.0];
        let cg = m.compute_cg(&[0.5, 1.0], &times);
        assert_eq!(cg.shape(), (2, 2));
        assert!(cg.is_complete());
        assert_relative_eq!(cg.value(1, 0), 0.0427334845, max_relative = 1e-4);
        assert_relative_eq!(cg.value(0, 0), 0.3434036786, max_relative = 1e-4);

        let cl = m.compute_cl(&[1.0, 2.0], &[1.0]);
        assert_eq!(cl.phase, Phase::Liquid);
        assert_relative_eq!(cl.value(0, 0), 0.0609982730, max_relative = 1e-4);
        assert_relative_eq!(cl.value(0, 1), 0.0505964597, max_relative = 1e-4);
    }
}
