use csv::WriterBuilder;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Signed distance from boresight, wrapped into -180..=180.
fn offset_from_boresight(angle_deg: f64) -> f64 {
    let wrapped = angle_deg % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Co-pol cut: parabolic main lobe over a rippled sidelobe floor.
fn copol_pattern(angle_deg: f64) -> f64 {
    let d = offset_from_boresight(angle_deg);
    let main_lobe = 12.0 - 3.0 * (d / 15.0).powi(2);
    let sidelobes = -28.0 + 5.0 * (3.0 * d.to_radians()).cos();
    main_lobe.max(sidelobes)
}

/// Cross-pol cut: the co-pol shape pushed down, with its own lobe ripple.
fn xpol_pattern(angle_deg: f64) -> f64 {
    let d = offset_from_boresight(angle_deg);
    copol_pattern(angle_deg) - 32.0 + 4.0 * (2.0 * d.to_radians()).sin()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Co-pol sweep: 1° steps, comma separated.
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .from_path("sample_copol.csv")
        .expect("Failed to create sample_copol.csv");
    wtr.write_record(["Azimuth", "Power-dBm"])
        .expect("Failed to write header");
    let mut copol_rows = 0usize;
    for i in 0..360 {
        let angle = i as f64;
        let power = copol_pattern(angle) + rng.gauss(0.0, 0.15);
        // A couple of rows with unusable power cells, like real sweep logs.
        match i {
            123 => wtr.write_record([format!("{angle:.1}"), "N/A".to_string()]),
            200 => wtr.write_record([format!("{angle:.1}")]),
            _ => wtr.write_record([format!("{angle:.1}"), format!("{power:.2}")]),
        }
        .expect("Failed to write record");
        copol_rows += 1;
    }
    wtr.flush().expect("Failed to flush sample_copol.csv");

    // Cross-pol sweep: coarser 2° grid, semicolon separated.
    let mut wtr = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path("sample_xpol.csv")
        .expect("Failed to create sample_xpol.csv");
    wtr.write_record(["Azimuth", "Power-dBm"])
        .expect("Failed to write header");
    let mut xpol_rows = 0usize;
    for i in 0..180 {
        let angle = (i * 2) as f64;
        let power = xpol_pattern(angle) + rng.gauss(0.0, 0.25);
        if i == 45 {
            wtr.write_record([format!("{angle:.1}"), "--".to_string()])
        } else {
            wtr.write_record([format!("{angle:.1}"), format!("{power:.2}")])
        }
        .expect("Failed to write record");
        xpol_rows += 1;
    }
    wtr.flush().expect("Failed to flush sample_xpol.csv");

    println!(
        "Wrote {copol_rows} co-pol rows to sample_copol.csv and {xpol_rows} cross-pol rows to sample_xpol.csv"
    );
}
