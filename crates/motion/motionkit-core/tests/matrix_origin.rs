use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use motionkit_core::{
    compose_around_origin, multiply, resolve_origin, rotate, scale, to_transform_string,
    translate, BoundingBox, Matrix, Point,
};

const EPS: f64 = 1e-9;

fn assert_matrix_eq(actual: &Matrix, expected: &Matrix) {
    assert!(
        actual.approx_eq(expected, EPS),
        "left={actual:?} right={expected:?}"
    );
}

fn random_matrix(rng: &mut StdRng) -> Matrix {
    Matrix::new(
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-5.0..5.0),
        rng.gen_range(-100.0..100.0),
        rng.gen_range(-100.0..100.0),
    )
}

#[test]
fn rotation_cancels_its_inverse() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let angle = rng.gen_range(-720.0..720.0);
        let m = multiply(&rotate(angle), &rotate(-angle));
        assert_matrix_eq(&m, &Matrix::IDENTITY);
    }
}

#[test]
fn multiply_is_associative() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let (a, b, c) = (
            random_matrix(&mut rng),
            random_matrix(&mut rng),
            random_matrix(&mut rng),
        );
        let left = multiply(&multiply(&a, &b), &c);
        let right = multiply(&a, &multiply(&b, &c));
        // Products of the sampled ranges stay well below 1e4.
        assert!(left.approx_eq(&right, 1e-7), "left={left:?} right={right:?}");
    }
}

#[test]
fn multiply_is_not_commutative() {
    let a = translate(10.0, 0.0);
    let b = scale(2.0, 2.0);
    assert_ne!(multiply(&a, &b), multiply(&b, &a));
}

#[test]
fn identity_pivot_has_no_effect() {
    let mut rng = StdRng::seed_from_u64(3);
    let specs = ["50% 50%", "50% 100%", "0 0", "120", "10px 30%", "100%"];
    for _ in 0..50 {
        let bbox = BoundingBox::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(-50.0..50.0),
            rng.gen_range(0.0..300.0),
            rng.gen_range(0.0..300.0),
        );
        for spec in specs {
            let m = compose_around_origin(&bbox, &Matrix::IDENTITY, spec);
            assert_matrix_eq(&m, &Matrix::IDENTITY);
        }
    }
}

#[test]
fn scale_about_bottom_center() {
    let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let m = compose_around_origin(&bbox, &scale(2.0, 2.0), "50% 100%");
    // translate(50,50) · scale(2) · translate(-50,-50)
    assert_matrix_eq(&m, &Matrix::new(2.0, 0.0, 0.0, 2.0, -50.0, -50.0));
    let top_left = m.apply_to_point(Point::new(0.0, 0.0));
    assert_abs_diff_eq!(top_left.x, -50.0);
    assert_abs_diff_eq!(top_left.y, -50.0);
}

#[test]
fn rotate_about_center_keeps_center() {
    let bbox = BoundingBox::new(20.0, 40.0, 60.0, 60.0);
    let m = compose_around_origin(&bbox, &rotate(45.0), "50% 50%");
    let c = m.apply_to_point(Point::new(50.0, 70.0));
    assert_abs_diff_eq!(c.x, 50.0, epsilon = EPS);
    assert_abs_diff_eq!(c.y, 70.0, epsilon = EPS);
}

#[test]
fn malformed_origin_propagates_nan() {
    let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let m = compose_around_origin(&bbox, &rotate(30.0), "center");
    assert!(m.e.is_nan() && m.f.is_nan());
    assert!(to_transform_string(&m).contains("NaN"));
}

#[test]
fn transform_string_for_uniform_scale() {
    assert_eq!(to_transform_string(&scale(2.0, 2.0)), "matrix(2,0,0,2,0,0)");
}

#[derive(Debug, Deserialize)]
struct OriginCase {
    bbox: BoundingBox,
    spec: String,
    expected: [f64; 2],
}

#[test]
fn origin_fixture_table() {
    let cases: Vec<OriginCase> =
        motionkit_test_fixtures::origins::load("cases").expect("origin cases fixture");
    assert!(!cases.is_empty());
    for case in cases {
        let p = resolve_origin(&case.bbox, &case.spec);
        assert_abs_diff_eq!(p.x, case.expected[0]);
        assert_abs_diff_eq!(p.y, case.expected[1]);
    }
}

#[test]
fn percent_origin_is_corner_relative() {
    let p = resolve_origin(&BoundingBox::new(0.0, 0.0, 100.0, 50.0), "50% 100%");
    assert_eq!(p, Point::new(50.0, 50.0));
}
