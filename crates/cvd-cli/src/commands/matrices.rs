//! Matrix table command

use anyhow::Result;
use cvd_math::Mat3;
use cvd_vision::{FROM_RGB, TO_RGB, matrix_table};

pub fn run() -> Result<()> {
    print_matrix("rgb -> lms", &FROM_RGB);
    print_matrix("lms -> rgb", &TO_RGB);

    for (condition, transform) in matrix_table() {
        match transform.matrix() {
            Some(m) => print_matrix(condition.name(), m),
            None => println!("{}\n  (no-op)\n", condition.name()),
        }
    }
    Ok(())
}

fn print_matrix(label: &str, m: &Mat3) {
    println!("{}", label);
    for row in &m.m {
        println!("  [{:>12.8} {:>12.8} {:>12.8}]", row[0], row[1], row[2]);
    }
    println!();
}
