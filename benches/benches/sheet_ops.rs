//! Benchmark suite for sheet slicing and packing
//!
//! Measures the two bulk raster paths: cropping every cell out of a source
//! sheet, and packing a populated graph back into a fresh sheet.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dmikit_benches::{generate_descriptor, generate_image, generate_sheet, sizes};
use dmikit_types::file::dmi::descriptor;
use dmikit_types::prelude::*;
use std::hint::black_box;

fn bench_slice(c: &mut Criterion) {
	let mut group = c.benchmark_group("dmi_slice");
	let cell = CellSize::new(32, 32);

	for (name, (states, dirs, frames)) in
		[("small", sizes::SMALL), ("medium", sizes::MEDIUM), ("large", sizes::LARGE)]
	{
		let cells = states * dirs * frames;
		let columns = cells.min(10);
		let rows = cells.div_ceil(columns);
		let sheet = generate_sheet(columns, rows, cell);
		let text = generate_descriptor(states, dirs, frames, cell);

		group.throughput(Throughput::Elements(u64::from(cells)));
		group.bench_with_input(BenchmarkId::new("slice", name), &sheet, |b, sheet| {
			b.iter(|| {
				let parsed = descriptor::parse(&text, &VariantConfig::none()).unwrap();
				let mut raster_source = SheetSource::new(black_box(sheet), cell);
				let dmi = DmiFile::assemble("bench", parsed, cell, &mut raster_source);
				black_box(dmi)
			});
		});
	}

	group.finish();
}

fn bench_pack(c: &mut Criterion) {
	let mut group = c.benchmark_group("dmi_pack");
	let cell = CellSize::new(32, 32);

	for (name, (states, dirs, frames)) in
		[("small", sizes::SMALL), ("medium", sizes::MEDIUM), ("large", sizes::LARGE)]
	{
		let image = generate_image(states, dirs, frames, cell);

		group.throughput(Throughput::Elements(u64::from(image.cell_count())));
		group.bench_with_input(BenchmarkId::new("pack", name), &image, |b, image| {
			b.iter(|| {
				let sheet = black_box(image).pack_sheet();
				black_box(sheet)
			});
		});
	}

	group.finish();
}

fn bench_descriptor_roundtrip(c: &mut Criterion) {
	let cell = CellSize::new(32, 32);
	let image = generate_image(32, 8, 8, cell);

	c.bench_function("descriptor_serialize", |b| {
		b.iter(|| black_box(image.descriptor_text()));
	});

	let text = image.descriptor_text();
	c.bench_function("descriptor_parse", |b| {
		b.iter(|| {
			let parsed = descriptor::parse(black_box(&text), &VariantConfig::none());
			black_box(parsed)
		});
	});
}

criterion_group!(benches, bench_slice, bench_pack, bench_descriptor_roundtrip);
criterion_main!(benches);
