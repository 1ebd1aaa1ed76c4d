use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use scree_geom::Vec3;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn approx_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    (a - b).abs() <= atol + rtol * a.abs().max(b.abs())
}

fn vapprox_rel(a: Vec3, b: Vec3, atol: f32, rtol: f32) -> bool {
    approx_rel(a.x, b.x, atol, rtol)
        && approx_rel(a.y, b.y, atol, rtol)
        && approx_rel(a.z, b.z, atol, rtol)
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn unit_scale_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("unit_scale", |v| {
        v.is_finite() && {
            let a = v.abs();
            (1e-3..=1e3).contains(&a)
        }
    })
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn arb_unit_scale_vec3() -> impl Strategy<Value = Vec3> {
    (unit_scale_f32(), unit_scale_f32(), unit_scale_f32())
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // a + b == b + a component-wise
    #[test]
    fn add_commutative(a in arb_vec3(), b in arb_vec3()) {
        let l = a + b;
        let r = b + a;
        prop_assert!(vapprox_rel(l, r, 1e-6, 1e-6));
    }

    // a - a == 0
    #[test]
    fn sub_self_is_zero(a in arb_vec3()) {
        prop_assert!(vapprox_rel(a - a, Vec3::ZERO, 1e-6, 0.0));
    }

    // dot is symmetric
    #[test]
    fn dot_symmetric(a in arb_vec3(), b in arb_vec3()) {
        prop_assert!(approx_rel(a.dot(b), b.dot(a), 1e-6, 1e-5));
    }

    // cross result is orthogonal to both inputs
    #[test]
    fn cross_orthogonal(a in arb_unit_scale_vec3(), b in arb_unit_scale_vec3()) {
        let c = a.cross(b);
        let scale = (a.length() * c.length()).max(b.length() * c.length());
        prop_assert!(a.dot(c).abs() <= 1e-6 + 1e-5 * scale);
        prop_assert!(b.dot(c).abs() <= 1e-6 + 1e-5 * scale);
    }

    // |normalized(v)| == 1 for non-degenerate v
    #[test]
    fn normalized_has_unit_length(v in arb_unit_scale_vec3()) {
        prop_assume!(v.length() > 0.0);
        prop_assert!(approx(v.normalized().length(), 1.0, 1e-3));
    }

    // k * (a + b) == k*a + k*b
    #[test]
    fn scalar_distributes_over_add(a in arb_vec3(), b in arb_vec3(), k in bounded_f32()) {
        let l = (a + b) * k;
        let r = a * k + b * k;
        prop_assert!(vapprox_rel(l, r, 1e-6, 1e-5));
    }

    // |a + b| <= |a| + |b|
    #[test]
    fn triangle_inequality(a in arb_vec3(), b in arb_vec3()) {
        let lhs = (a + b).length();
        let rhs = a.length() + b.length();
        prop_assert!(lhs <= rhs + 1e-6 + 1e-5 * rhs.max(1.0));
    }

    // with_y replaces y and leaves x/z untouched
    #[test]
    fn with_y_only_touches_y(v in arb_vec3(), y in bounded_f32()) {
        let w = v.with_y(y);
        prop_assert_eq!(w.x, v.x);
        prop_assert_eq!(w.y, y);
        prop_assert_eq!(w.z, v.z);
    }

    // negation flips every component
    #[test]
    fn neg_flips_components(v in arb_vec3()) {
        let n = -v;
        prop_assert_eq!(n.x, -v.x);
        prop_assert_eq!(n.y, -v.y);
        prop_assert_eq!(n.z, -v.z);
    }
}
