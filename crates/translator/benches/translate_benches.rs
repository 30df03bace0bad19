// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Translation throughput over programs of increasing size, with and without
//! source maps.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use stree_translator::cst::Node;
use stree_translator::testing::TreeBuilder;
use stree_translator::{SourceBuffer, TranslateOptions, translate_with_options};

/// `x = a + 1` followed by `foo.bar(x, 2)`, repeated `count` times.
fn program(count: usize) -> (SourceBuffer, Node) {
    let source = (0..count)
        .map(|_| "x = a + 1\nfoo.bar(x, 2)\n")
        .collect::<String>();
    let mut t = TreeBuilder::new(&source);
    let mut body = vec![];
    for _ in 0..count {
        let target = t.var_field("x");
        let a = t.vcall("a");
        let one = t.int("1");
        let sum = t.binary(a, "+", one);
        body.push(t.assign(target, sum));

        let foo = t.vcall("foo");
        let x = t.var_ref("x");
        let two = t.int("2");
        body.push(t.call(Some(foo), ".", "bar", vec![x, two], true));
    }
    let root = t.program(body);
    (t.buffer(), root)
}

fn translate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");
    for count in [1, 10, 100, 1000] {
        let (buffer, root) = program(count);
        group.throughput(Throughput::Elements(count as u64 * 2));

        let with_maps = TranslateOptions::default();
        group.bench_with_input(BenchmarkId::new("source_maps", count), &root, |b, root| {
            b.iter(|| black_box(translate_with_options(&buffer, black_box(root), &with_maps)))
        });

        let bare = TranslateOptions::without_source_maps();
        group.bench_with_input(BenchmarkId::new("bare", count), &root, |b, root| {
            b.iter(|| black_box(translate_with_options(&buffer, black_box(root), &bare)))
        });
    }
    group.finish();
}

fn display_benchmark(c: &mut Criterion) {
    let (buffer, root) = program(100);
    let Ok(Some(ast)) = translate_with_options(&buffer, &root, &TranslateOptions::default()) else {
        return;
    };
    c.bench_function("sexp/100", |b| b.iter(|| black_box(ast.to_string())));
}

criterion_group!(benches, translate_benchmark, display_benchmark);
criterion_main!(benches);
