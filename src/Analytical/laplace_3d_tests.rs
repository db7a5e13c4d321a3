#[cfg(test)]
mod tests {
    use super::super::batch::evaluate_field;
    use super::super::laplace_3d::*;
    use super::super::models::{ConcentrationModel, EvaluationPolicy, ProblemParameters};
    use crate::Numerical::quadrature::QuadratureSettings;
    use crate::errors::{HenryError, Phase};
    use approx::assert_relative_eq;

    fn params(alpha: f64) -> ProblemParameters {
        // Dg = 1, Dl = 4, R0 = 1, c0 = 1
        ProblemParameters::new(1.0, 4.0, 1.0, alpha, 1.0).unwrap()
    }

    fn model() -> LaplaceModel3D {
        LaplaceModel3D::new(params(1.0)).unwrap()
    }

    #[test]
    fn test_reference_values() {
        let m = model();
        let cg = m.gas_concentration(0.5, 1.2).unwrap();
        assert!(cg.converged);
        assert_eq!(cg.degenerate_samples, 0);
        assert_eq!(cg.upper_bound, DEFAULT_X_MAX);
        assert_relative_eq!(cg.value, 0.0109753718, max_relative = 1e-5);

        let cl = m.liquid_concentration(1.5, 1.2).unwrap();
        assert!(cl.converged);
        assert_relative_eq!(cl.value, 0.0083685297, max_relative = 1e-5);
    }

    #[test]
    fn test_gas_history() {
        let m = model();
        let cases = [
            (0.01, 0.99943920),
            (0.1, 0.58389184),
            (1.0, 0.0153605746),
            (5.0, 0.00108936788),
        ];
        for (t, expected) in cases {
            let cg = m.gas_concentration(0.5, t).unwrap();
            assert_relative_eq!(cg.value, expected, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_liquid_profile_values() {
        let m = model();
        assert_relative_eq!(
            m.liquid_concentration(1.5, 0.5).unwrap().value,
            0.0272331906,
            max_relative = 1e-5
        );
        assert_relative_eq!(
            m.liquid_concentration(3.0, 1.2).unwrap().value,
            0.0057402356,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_gas_above_liquid_for_unit_partition() {
        let m = model();
        let cg = m.gas_concentration(0.5, 1.2).unwrap().value;
        let cl = m.liquid_concentration(1.5, 1.2).unwrap().value;
        assert!(cg > cl);
        assert!(cl > 0.0);
    }

    #[test]
    fn test_interface_partition() {
        let m = model();
        let cg = m.gas_concentration(1.0, 1.2).unwrap().value;
        let cl = m.liquid_concentration(1.0, 1.2).unwrap().value;
        assert_relative_eq!(cg, 0.00902773007, max_relative = 1e-5);
        assert_relative_eq!(cl, cg, max_relative = 1e-5);

        let m2 = LaplaceModel3D::new(params(2.0)).unwrap();
        let cg = m2.gas_concentration(1.0, 1.2).unwrap().value;
        let cl = m2.liquid_concentration(1.0, 1.2).unwrap().value;
        assert_relative_eq!(cg, 0.00415588543, max_relative = 1e-5);
        assert_relative_eq!(cl / cg, 2.0, max_relative = 1e-5);
        assert_relative_eq!(
            m2.gas_concentration(0.5, 1.2).unwrap().value,
            0.00502314086,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_decay_in_time() {
        let m = model();
        let series = m.cg_series(0.5, &[0.1, 1.0, 5.0]);
        assert!(series.is_complete());
        let history = series.history_at(0);
        assert!(history[0] > history[1] && history[1] > history[2]);

        let liquid = m.cl_series(1.5, &[0.5, 1.2]);
        assert_eq!(liquid.shape(), (2, 1));
        assert_relative_eq!(liquid.value(1, 0), 0.0083685297, max_relative = 1e-5);
    }

    #[test]
    fn test_truncation_check() {
        let m = model();
        let check = m.check_truncation(Phase::Gas, 0.5, 1.2).unwrap();
        assert!(check.is_converged(1e-5));
        assert_eq!(check.doubled.upper_bound, 2.0 * DEFAULT_X_MAX);
        assert_relative_eq!(check.doubled.value, 0.0109753718, max_relative = 1e-5);
        // the error estimate of the doubled range stays at the requested accuracy
        assert!(check.doubled.converged);
        assert!(check.doubled.abs_error <= 1e-7);
        assert!(check.doubled.abs_error <= 10.0 * check.base.abs_error.max(1.49e-8));

        let wide = model().with_x_max(2000.0).unwrap();
        assert_eq!(wide.x_max(), 2000.0);
        assert_relative_eq!(
            wide.gas_concentration(0.5, 1.2).unwrap().value,
            0.0109753718,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_gas_content_non_increasing() {
        let m = model();
        // midpoint rule for ∫ 4πr² c_g dr over (0, R0]
        let n = 20;
        let dr = 1.0 / n as f64;
        let radii: Vec<f64> = (0..n).map(|k| (k as f64 + 0.5) * dr).collect();
        let times = [0.05, 0.2, 1.0];
        let field = evaluate_field(&m, Phase::Gas, &radii, &times);
        assert!(field.is_complete());
        let content: Vec<f64> = (0..times.len())
            .map(|i| {
                radii
                    .iter()
                    .enumerate()
                    .map(|(j, r)| 4.0 * std::f64::consts::PI * r * r * field.value(i, j) * dr)
                    .sum()
            })
            .collect();
        let initial = 4.0 * std::f64::consts::PI / 3.0;
        assert!(content[0] < initial);
        assert!(content[0] >= content[1]);
        assert!(content[1] >= content[2]);
        assert!(content[2] > 0.0);
    }

    #[test]
    fn test_without_substitution() {
        let settings = QuadratureSettings::laplace_default().with_sqrt_substitution(false);
        let m = model().with_quadrature(settings);
        let cg = m.gas_concentration(0.5, 1.2).unwrap();
        assert!(cg.converged);
        assert_relative_eq!(cg.value, 0.0109753718, max_relative = 1e-5);
    }

    #[test]
    fn test_kernel_on_branch_cut() {
        let m = model();
        let k = m.kernel();
        let lg = k.lambda_g(4.0);
        assert_eq!(lg.re, 0.0);
        assert_relative_eq!(lg.im, 2.0, epsilon = 1e-14);
        let ll = k.lambda_l(4.0);
        assert_relative_eq!(ll.im, 1.0, epsilon = 1e-14);
        assert!(k.zeta(1.0).norm() > 0.0);
    }

    #[test]
    fn test_radial_profile() {
        let m = model();
        let profile = m.radial_profile(1.2, &[0.5, 1.0], &[1.0, 1.5]);
        assert!(profile.failures.is_empty());
        assert_eq!(profile.phases, vec![Phase::Gas, Phase::Gas, Phase::Liquid, Phase::Liquid]);
        assert_relative_eq!(profile.values[0], 0.0109753718, max_relative = 1e-5);
        assert_relative_eq!(profile.values[1], profile.values[2], max_relative = 1e-5);
        assert_relative_eq!(profile.values[3], 0.0083685297, max_relative = 1e-5);
    }

    #[test]
    fn test_errors() {
        let m = model();
        assert!(matches!(
            m.gas_concentration(1.5, 1.0),
            Err(HenryError::OutOfDomain { .. })
        ));
        assert!(m.liquid_concentration(0.5, 1.0).is_err());
        assert!(m.gas_concentration(0.5, 0.0).is_err());
        assert!(m.gas_concentration(-0.5, 1.0).is_err());
        assert!(model().with_x_max(0.0).is_err());
        assert!(model().with_x_max(f64::NAN).is_err());

        let strict = model()
            .with_quadrature(QuadratureSettings::laplace_default().with_max_subdivisions(1))
            .with_policy(EvaluationPolicy::Strict);
        assert!(matches!(
            strict.gas_concentration(0.5, 0.01),
            Err(HenryError::NonConvergence { .. })
        ));
    }
}
