use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taxstat::summary_parser::{count_protein_coding_genes, parse_assembly_length};

const GENE_TYPES: [&str; 4] = ["PROTEIN_CODING", "ncRNA", "PSEUDO", "tRNA"];

// Roughly the size of a mammalian gene summary
fn gene_summary(num_genes: usize) -> Vec<u8> {
    let reports: Vec<String> = (0..num_genes)
        .map(|i| {
            format!(
                r#"{{"gene":{{"gene_id":"{}","symbol":"G{}","tax_id":"10090","taxname":"Mus musculus","type":"{}"}}}}"#,
                100_000 + i,
                i,
                GENE_TYPES[i % GENE_TYPES.len()]
            )
        })
        .collect();
    format!(r#"{{"reports":[{}],"total_count":{}}}"#, reports.join(","), num_genes).into_bytes()
}

fn benchmark_parsing(c: &mut Criterion) {
    let genes = gene_summary(60_000);
    c.bench_function("count protein-coding genes", |b| {
        b.iter(|| count_protein_coding_genes("mus musculus", black_box(&genes)))
    });

    let genome = br#"{"reports":[{"accession":"GCF_000001635.27","assembly_stats":{"total_sequence_length":"2728206152"}}],"total_count":1}"#;
    c.bench_function("parse assembly length", |b| {
        b.iter(|| parse_assembly_length("mus musculus", black_box(genome)))
    });
}

criterion_group!(benches, benchmark_parsing);
criterion_main!(benches);
