use srim_core::domain::SrimErrorCategory;
use srim_core::modules::transmit::{ParticleType, read_transmitted};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TRANSMIT_FILE: &str = "\
============================== SRIM-2013.00 ==============================\r
==============================================================================\r
=================  TRANSMIT.txt : File of Transmitted Ions  ==================\r
=  This file tabulates the kinetics of ions or atoms leaving the target.     =\r
=  Column #1: S= Sputtered Atom, B= Backscattered Ion, T= Transmitted Ion.   =\r
=  Col.#2: Ion Number, Col.#3: Z of atom leaving, Col.#4: Atom energy (eV).  =\r
=  Col.#5-7: Last location:  X= Depth into target, Y,Z= Transverse axes.     =\r
=  Col.#8-10: Cosines of final trajectory.                                   =\r
= *** This data file is in the same format as TRIM.DAT (see manual for uses).=\r
====== TRIM Calc.=  H(10 MeV) ==> Ti_1+Ni_1(  50 um) =========================\r
 Ion  Atom   Energy        Depth       Lateral-Position        Atom Direction\r
 Numb Numb    (eV)          X(A)        Y(A)       Z(A)      Cos(X)  Cos(Y) Cos(Z)\r
T    1  1  .96515E+07  500000.E+00  -325.8E+00  1290.E+00  .99992  -.00421  .01207\r
T    2  1  .96470E+07  500000.E+00  1217.E+00  -212.4E+00  .99996  .00883  -.00051\r
S    2 22  .11230E+02  .0000E+00  14.51E+00  -8.203E+00  -.71022  .30112  .63598\r
";

fn write(directory: &Path) {
    fs::create_dir_all(directory).expect("output directory should be created");
    fs::write(directory.join("TRANSMIT.txt"), TRANSMIT_FILE).expect("transmit file written");
}

#[test]
fn transmit_file_in_run_directory_is_read_directly() {
    let temp = TempDir::new().expect("tempdir should be created");
    write(temp.path());

    let run = read_transmitted(temp.path(), "TRANSMIT.txt", "SRIM Outputs")
        .expect("transmit file should parse");
    assert_eq!(run.metadata.layer_name, "Ti_1+Ni_1");
    assert_eq!(run.metadata.layer_thickness.unit, "um");
    assert_eq!(run.events.len(), 3);
    assert_eq!(run.count(ParticleType::Transmitted), 2);
    assert_eq!(run.count(ParticleType::Sputtered), 1);

    let sputtered = &run.events[2];
    assert_eq!(sputtered.atomic_number, 22);
    assert_eq!(sputtered.energy_ev, 11.23);
    assert_eq!(sputtered.position[0], 0.0);
}

#[test]
fn transmit_file_under_fallback_subfolder_is_found_on_retry() {
    let temp = TempDir::new().expect("tempdir should be created");
    write(&temp.path().join("SRIM Outputs"));

    let run = read_transmitted(temp.path(), "TRANSMIT.txt", "SRIM Outputs")
        .expect("fallback location should be tried");
    assert_eq!(run.metadata.projectile, "H");
    assert_eq!(run.metadata.beam_energy.value, 10.0);
}

#[test]
fn transmit_file_absent_everywhere_is_resource_not_found() {
    let temp = TempDir::new().expect("tempdir should be created");
    fs::create_dir(temp.path().join("SRIM Outputs")).expect("empty subfolder created");

    let error = read_transmitted(temp.path(), "TRANSMIT.txt", "SRIM Outputs")
        .expect_err("missing transmit file should fail");
    assert_eq!(error.category(), SrimErrorCategory::ResourceNotFound);
    assert_eq!(error.placeholder(), "IO.TRANSMIT_READ");
    assert!(error.message().contains("SRIM Outputs"));
}
