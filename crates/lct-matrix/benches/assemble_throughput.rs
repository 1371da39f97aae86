use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lct_basis::{BasisProvider, DirichletBasis};
use lct_elem::MassTerm;
use lct_matrix::{assemble, build_matrices, AssemblyOpts};

fn assemble_benchmark(c: &mut Criterion) {
    let opts = AssemblyOpts::default();
    let wide = DirichletBasis::new().generate(24.0).expect("basis");
    c.bench_function("mass_matrix_d24", |b| {
        b.iter(|| assemble(black_box(wide.states()), &MassTerm, &opts).expect("mass"))
    });

    let narrow = DirichletBasis::new().generate(6.0).expect("basis");
    c.bench_function("truncation_matrices_d6", |b| {
        b.iter(|| build_matrices(black_box(&narrow), &opts).expect("matrices"))
    });
}

criterion_group!(benches, assemble_benchmark);
criterion_main!(benches);
