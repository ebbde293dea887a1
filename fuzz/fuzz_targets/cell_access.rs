#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_resin_stable_fluids::{FieldKind, Solver};

fuzz_target!(|data: &[u8]| {
    // Checked cell access and stepping should never panic on any input
    let Some((&n, rest)) = data.split_first() else {
        return;
    };
    let Ok(mut solver) = Solver::new(n as usize % 24) else {
        return;
    };

    for chunk in rest.chunks_exact(4) {
        let kind = FieldKind::ALL[chunk[0] as usize % FieldKind::ALL.len()];
        let (x, y) = (chunk[1] as usize, chunk[2] as usize);
        let value = f64::from(chunk[3] as i8);
        if solver.set_cell(kind, x, y, value).is_ok() {
            assert_eq!(solver.cell(kind, x, y), Ok(value));
        }
    }
    solver.step();
});
