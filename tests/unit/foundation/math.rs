use super::*;

#[test]
fn fract_turn_keeps_sign_of_input() {
    assert!((fract_turn(2.25) - 0.25).abs() < 1e-12);
    assert!((fract_turn(-2.25) + 0.25).abs() < 1e-12);
    assert_eq!(fract_turn(3.0), 0.0);
    assert_eq!(fract_turn(0.0), 0.0);
}

#[test]
fn catmull_rom_hits_control_points() {
    assert_eq!(catmull_rom(9.0, 2.0, 5.0, -3.0, 0.0), 2.0);
    assert!((catmull_rom(9.0, 2.0, 5.0, -3.0, 1.0) - 5.0).abs() < 1e-12);
}

#[test]
fn catmull_rom_is_exact_on_lines_and_constants() {
    for d in [0.0, 0.1, 0.5, 0.73, 1.0] {
        assert!((catmull_rom(4.0, 4.0, 4.0, 4.0, d) - 4.0).abs() < 1e-12);
        assert!((catmull_rom(-1.0, 0.0, 1.0, 2.0, d) - d).abs() < 1e-12);
    }
}
