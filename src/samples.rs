//! Built-in sample buffers, one per content mode.

use crate::app::ContentMode;

pub const MARKDOWN: &str = r#"# Welcome to markpane

A split-pane editor with a live terminal preview.

## Features

- **Bold text** and *italic text*
- [Links](https://example.com) that stand out
- Tables, task lists, and diagrams

### Code Blocks

```rust
fn greet(name: &str) {
    println!("Hello, {name}!");
}
```

Inline code works too: `let x = 42;`

### Diagrams

```mermaid
flowchart TD
  Edit[Edit buffer] --> Parse{Valid?}
  Parse --> Render[Render preview]
  Parse --> Error[Show error panel]
```

### Blockquotes

> "The best way to predict the future is to invent it."

### Tables

| Feature | Status |
|---------|--------|
| Headings | yes |
| Code blocks | yes |
| Diagrams | yes |

---

*Edit on the left to see changes rendered here.*
"#;

pub const CSV: &str = "\
name,role,city,started
Alice,Engineer,Lisbon,2019
Bob,Designer,Oslo,2021
Carol,Product,Austin,2018
Dmitri,Engineer,Berlin,2022
Eve,Research,Kyoto,2020";

pub const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>HTML Preview Demo</title>
  <style>
    body { font-family: sans-serif; }
  </style>
</head>
<body>
  <h1>HTML Preview Demo</h1>
  <p>This is a <strong>sample document</strong> projected to text. Styles
  and scripts never run.</p>

  <h2>Key Points</h2>
  <ul>
    <li>Tags are stripped, entities like &amp; are decoded</li>
    <li>Script and style blocks are dropped entirely</li>
    <li>Switch modes to preview markdown or delimited data</li>
  </ul>
</body>
</html>"#;

/// The sample buffer for a content mode.
pub const fn for_mode(mode: ContentMode) -> &'static str {
    match mode {
        ContentMode::Markdown => MARKDOWN,
        ContentMode::Csv => CSV,
        ContentMode::Html => HTML,
    }
}
