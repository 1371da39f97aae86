use lct_basis::{BasisProvider, DirichletBasis, PrimaryBasis};
use lct_core::errors::{ErrorInfo, LctError};
use lct_matrix::{generate, generate_to_dir, hermiticity_defect, AssemblyOpts, RunConfig, TruncationRecord};
use tempfile::tempdir;

struct Broken;

impl BasisProvider for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn generate(&self, _del_max: f64) -> Result<PrimaryBasis, LctError> {
        Err(LctError::Basis(ErrorInfo::new("provider-offline", "no basis today")))
    }
}

fn opts() -> AssemblyOpts {
    AssemblyOpts {
        threads: 2,
        ..AssemblyOpts::default()
    }
}

#[test]
fn lowest_cutoff_produces_two_by_two_matrices() {
    let record = generate(&DirichletBasis::new(), 4.0, &opts()).expect("generate");
    assert_eq!(record.dim(), 2);
    assert_eq!(record.del_max, 4.0);
    let mass = record.mass_matrix().expect("mass");
    let inter = record.inter_matrix().expect("inter");
    assert_eq!(mass.shape(), (2, 2));
    assert_eq!(inter.shape(), (2, 2));
    assert!((mass[(0, 0)].re - 6.0).abs() < 1e-12);
    for i in 0..2 {
        assert!(mass[(i, i)].re > 0.0);
        assert_eq!(mass[(i, i)].im, 0.0);
        assert_eq!(inter[(i, i)].im, 0.0);
    }
    assert_eq!(hermiticity_defect(&mass), 0.0);
    assert_eq!(hermiticity_defect(&inter), 0.0);
    record.verify().expect("fresh record verifies");
}

#[test]
fn provenance_records_every_quadrature_knob() {
    let mut relaxed = opts();
    relaxed.quadrature.relaxed_retry_factor = Some(100.0);
    relaxed.quadrature.timeout_ms = Some(60_000);
    let record = generate(&DirichletBasis::new(), 4.0, &relaxed).expect("generate");
    let provenance = &record.provenance;
    assert_eq!(provenance.max_subdivisions, 50);
    assert_eq!(provenance.timeout_ms, Some(60_000));
    assert_eq!(provenance.relaxed_retry_factor, Some(100.0));

    let strict = generate(&DirichletBasis::new(), 4.0, &opts()).expect("generate");
    assert_eq!(strict.provenance.relaxed_retry_factor, None);
    assert_ne!(strict.provenance, record.provenance);
}

#[test]
fn runs_are_byte_for_byte_reproducible() {
    let first = generate(&DirichletBasis::new(), 5.0, &opts()).expect("first");
    let second = generate(
        &DirichletBasis::new(),
        5.0,
        &AssemblyOpts {
            threads: 1,
            ..opts()
        },
    )
    .expect("second");
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
    assert_eq!(first.provenance.mass_hash, second.provenance.mass_hash);
}

#[test]
fn records_round_trip_through_disk() {
    let dir = tempdir().expect("tempdir");
    let config = RunConfig {
        out_dir: dir.path().join("out"),
        write_json: true,
        assembly: opts(),
        ..RunConfig::new(4.0)
    };
    let written = generate_to_dir(&DirichletBasis::new(), &config).expect("run");
    assert_eq!(written.len(), 2);
    assert!(written[0].ends_with("2DQED_trunc_D4.bin"));
    assert!(written[1].ends_with("2DQED_trunc_D4.json"));

    let binary = TruncationRecord::read(&written[0]).expect("binary");
    let json = TruncationRecord::read(&written[1]).expect("json");
    assert_eq!(binary, json);
    binary.verify().expect("verify");

    let basis = binary.load_basis().expect("basis");
    let fresh = DirichletBasis::new().generate(4.0).expect("fresh basis");
    assert_eq!(basis, fresh);
}

#[test]
fn tampered_records_fail_verification() {
    let mut record = generate(&DirichletBasis::new(), 4.0, &opts()).expect("generate");
    record.mass[0][0].re += 1.0;
    let err = record.verify().unwrap_err();
    assert_eq!(err.code(), "hash-mismatch");
    assert_eq!(err.info().context.get("payload").map(String::as_str), Some("mass"));

    let mut record = generate(&DirichletBasis::new(), 4.0, &opts()).expect("generate");
    record.inter.pop();
    assert_eq!(record.verify().unwrap_err().code(), "non-square-matrix");
}

#[test]
fn corrupted_bytes_are_a_serde_error() {
    let record = generate(&DirichletBasis::new(), 4.0, &opts()).expect("generate");
    let bytes = record.to_bytes().expect("bytes");
    let err = TruncationRecord::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, LctError::Serde(_)));
}

#[test]
fn provider_failures_propagate_unchanged() {
    let err = generate(&Broken, 4.0, &opts()).unwrap_err();
    assert_eq!(
        err,
        LctError::Basis(ErrorInfo::new("provider-offline", "no basis today"))
    );
}

#[test]
fn cutoff_below_the_lowest_primary_is_a_basis_error() {
    let err = generate(&DirichletBasis::new(), 2.5, &opts()).unwrap_err();
    assert!(matches!(err, LctError::Basis(_)));
    assert_eq!(err.code(), "empty-basis");
}

#[test]
fn invalid_quadrature_options_fail_before_any_work() {
    let mut bad = opts();
    bad.quadrature.epsilon = 0.9;
    let err = generate(&Broken, 4.0, &bad).unwrap_err();
    assert!(matches!(err, LctError::Config(_)));
}
