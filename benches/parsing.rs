//! Benchmarks for the three preview parsers.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use markpane::diagram::{self, DiagramConfig};
use markpane::document::Document;
use markpane::tabular::{self, Separator};

const MARKDOWN_DOC: &str = "\
# Release notes

Some **bold** text with a [link](https://example.com) and `code`.

## Changes

- faster parsing
- fewer allocations
- better diagnostics

| area | delta |
|------|-------|
| parse | -12% |
| render | -8% |

```rust
fn main() {
    println!(\"hello\");
}
```

> Quoted remark spanning a couple of lines so the wrapper has
> something to do.
";

const CSV_DOC: &str = "\
id,name,city,score
1,Alice,Lisbon,91
2,Bob,Porto,84
3,Carol,Braga,77
4,Dan,Faro,69
5,Erin,Aveiro,95";

const DIAGRAM_DOC: &str = "\
flowchart TD
  Edit --> Parse
  Parse --> Render
  Parse --> Error
  Render --> Draw";

fn bench_parse_markdown(c: &mut Criterion) {
    c.bench_function("parse_markdown", |b| {
        b.iter(|| Document::parse_with_layout(black_box(MARKDOWN_DOC), 100))
    });
}

fn bench_parse_csv(c: &mut Criterion) {
    c.bench_function("parse_csv", |b| {
        b.iter(|| tabular::parse(black_box(CSV_DOC), Separator::Comma).unwrap())
    });
}

fn bench_render_diagram(c: &mut Criterion) {
    let config = DiagramConfig { ascii: false };
    c.bench_function("render_diagram", |b| {
        b.iter(|| diagram::render(black_box(DIAGRAM_DOC), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_parse_markdown,
    bench_parse_csv,
    bench_render_diagram
);
criterion_main!(benches);
