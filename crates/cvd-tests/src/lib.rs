//! Integration tests for the cvd crates.
//!
//! End-to-end checks across I/O, the LMS transform and the simulator.

#[cfg(test)]
mod tests {
    use cvd_core::{Image, Rgba8, Surface};
    use cvd_math::Mat3;
    use cvd_vision::{LmsColor, VisionCondition, VisionSimulator, simulate_color, transform_with_matrix};
    use tempfile::tempdir;

    fn round_trip(r: u8, g: u8, b: u8) {
        let input = Rgba8::opaque(r, g, b);
        let out = LmsColor::from_rgb(input).unwrap().to_rgb();
        assert_eq!(out, input);
    }

    /// Every third value per channel, 0 through 255.
    #[test]
    fn test_identity_round_trip_coarse() {
        let steps: Vec<u8> = (0..=255u8).step_by(3).collect();
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    round_trip(r, g, b);
                }
            }
        }
    }

    #[test]
    #[ignore = "16.7M colors; run with --release -- --ignored"]
    fn test_identity_round_trip_full_cube() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    round_trip(r, g, b);
                }
            }
        }
    }

    #[test]
    fn test_identity_matrix_is_exact_too() {
        for v in [0u8, 1, 127, 128, 254, 255] {
            let c = Rgba8::opaque(v, 255 - v, v / 2);
            assert_eq!(transform_with_matrix(c, &Mat3::IDENTITY).unwrap(), c);
        }
    }

    /// Load -> simulate -> save -> load again.
    #[test]
    fn test_png_simulation_pipeline() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.png");
        let out_path = dir.path().join("out.png");

        let mut src = Image::new(16, 8);
        for y in 0..8 {
            for x in 0..16 {
                src.put_pixel(x, y, Rgba8::opaque((x * 16) as u8, (y * 32) as u8, 200));
            }
        }
        cvd_io::write(&src_path, &src).expect("Failed to write PNG");

        let mut img = cvd_io::read(&src_path).expect("Failed to read PNG");
        assert_eq!(img, src);
        let stats = VisionSimulator::new()
            .simulate_image(&mut img, VisionCondition::Tritanopia)
            .unwrap();
        assert_eq!(stats.pixels, 128);
        cvd_io::write(&out_path, &img).expect("Failed to write PNG");

        let loaded = cvd_io::read(&out_path).expect("Failed to read PNG");
        for (x, y, px) in src.pixels() {
            let expected = simulate_color(px, VisionCondition::Tritanopia).unwrap();
            assert_eq!(loaded.get_pixel(x, y).unwrap(), expected);
        }
    }

    /// A translucent PNG is rejected as-is and accepted once flattened.
    #[test]
    fn test_translucent_png_needs_flatten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        let mut src = Image::filled(4, 4, Rgba8::opaque(255, 0, 0));
        src.put_pixel(2, 1, Rgba8::new(255, 0, 0, 64));
        cvd_io::write(&path, &src).unwrap();

        let mut img = cvd_io::read(&path).unwrap();
        let before = img.clone();
        let mut sim = VisionSimulator::new();
        let err = sim.simulate_image(&mut img, VisionCondition::Protanopia).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(img, before);

        assert_eq!(cvd_io::flatten_alpha(&mut img, Rgba8::WHITE), 1);
        sim.simulate_image(&mut img, VisionCondition::Protanopia).unwrap();
        assert_eq!(img.pixel(0, 0), Rgba8::opaque(42, 45, 0));
        assert!(!img.is_locked());
    }

    /// Neutral grays come back unchanged under achromatopsia.
    #[test]
    fn test_achromatopsia_grays_are_stable() {
        for v in [0u8, 128, 255] {
            let once = simulate_color(Rgba8::gray(v), VisionCondition::Achromatopsia).unwrap();
            assert_eq!(once, Rgba8::gray(v));
        }
    }

    #[test]
    fn test_every_condition_on_large_image() {
        let mut src = Image::new(300, 250);
        for y in 0..250u32 {
            for x in 0..300u32 {
                src.put_pixel(x, y, Rgba8::opaque(x as u8, y as u8, (x ^ y) as u8));
            }
        }
        let mut sim = VisionSimulator::new().with_parallel_threshold(1);
        for condition in VisionCondition::ALL {
            let out = sim.simulated_copy(&src, condition).unwrap();
            for (x, y) in [(0, 0), (299, 249), (150, 17), (3, 200)] {
                let expected = simulate_color(src.pixel(x, y), condition).unwrap();
                assert_eq!(out.pixel(x, y), expected, "{} at ({}, {})", condition, x, y);
            }
        }
    }
}
