//! Benchmarks for unslide conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks convert synthetic decks of increasing slide count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;
const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Creates a synthetic PPTX deck with the given number of slides.
///
/// Every slide carries a title, a bulleted body and a filled shape so that
/// text layout, style interning and SVG drawing all take part.
fn create_test_pptx(slide_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let mut put = |name: &str, content: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    };

    let mut overrides = String::new();
    let mut ids = String::new();
    let mut rels = String::new();
    for n in 1..=slide_count {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        ));
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            n, REL, n
        ));
    }

    put(
        "[Content_Types].xml",
        &format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{}
</Types>"#,
            overrides
        ),
    );
    put(
        "ppt/presentation.xml",
        &format!(
            r#"<p:presentation {}><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#,
            NS, ids
        ),
    );
    put(
        "ppt/_rels/presentation.xml.rels",
        &format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        ),
    );
    put(
        "ppt/slideLayouts/slideLayout1.xml",
        &format!(r#"<p:sldLayout {}><p:cSld><p:spTree/></p:cSld></p:sldLayout>"#, NS),
    );
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#,
            REL
        ),
    );
    put(
        "ppt/slideMasters/slideMaster1.xml",
        &format!(
            r#"<p:sldMaster {}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree/></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2"/></p:sldMaster>"#,
            NS
        ),
    );

    for n in 1..=slide_count {
        put(
            &format!("ppt/slides/slide{}.xml", n),
            &format!(
                r#"<p:sld {ns}><p:cSld><p:spTree>
  <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="838200" y="365125"/><a:ext cx="10515600" cy="1325563"/></a:xfrm></p:spPr>
    <p:txBody><a:bodyPr/><a:p><a:r><a:rPr lang="en-US" b="1"/><a:t>Slide {n}</a:t></a:r></a:p></p:txBody></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="3" name="Body"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
    <p:spPr><a:xfrm><a:off x="838200" y="1825625"/><a:ext cx="10515600" cy="4351338"/></a:xfrm></p:spPr>
    <p:txBody><a:bodyPr/>
      <a:p><a:pPr><a:buAutoNum type="arabicPeriod"/></a:pPr><a:r><a:t>First point on slide {n}</a:t></a:r></a:p>
      <a:p><a:pPr lvl="1"><a:buChar char="-"/></a:pPr><a:r><a:rPr sz="2000" i="1"/><a:t>Detail</a:t></a:r></a:p>
      <a:p><a:pPr><a:buAutoNum type="arabicPeriod"/></a:pPr><a:r><a:t>Second point</a:t></a:r></a:p>
    </p:txBody></p:sp>
  <p:sp><p:nvSpPr><p:cNvPr id="4" name="Badge"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
    <p:spPr><a:xfrm rot="600000"><a:off x="9144000" y="5486400"/><a:ext cx="1828800" cy="914400"/></a:xfrm>
      <a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom>
      <a:solidFill><a:srgbClr val="4472C4"><a:lumMod val="75000"/></a:srgbClr></a:solidFill>
      <a:ln w="19050"><a:solidFill><a:srgbClr val="2F5597"/></a:solidFill></a:ln></p:spPr></p:sp>
</p:spTree></p:cSld></p:sld>"#,
                ns = NS,
                n = n
            ),
        );
        put(
            &format!("ppt/slides/_rels/slide{}.xml.rels", n),
            &format!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#,
                REL
            ),
        );
    }

    zip.finish().unwrap();
    buffer
}

/// Benchmark full conversion at various deck sizes.
fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    for slide_count in [1, 10, 50, 200].iter() {
        let data = create_test_pptx(*slide_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("slides", slide_count), &data, |b, data| {
            b.iter(|| {
                let options = unslide::ConvertOptions::default();
                let _ = unslide::convert_bytes(black_box(data), &options);
            });
        });
    }

    group.finish();
}

/// Benchmark standalone page assembly.
fn bench_html_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_document");

    for slide_count in [10, 50, 200].iter() {
        let data = create_test_pptx(*slide_count);
        let conversion = unslide::convert_bytes(&data, &unslide::ConvertOptions::default()).unwrap();

        group.bench_with_input(
            BenchmarkId::new("slides", slide_count),
            &conversion,
            |b, conversion| {
                b.iter(|| {
                    let _ = unslide::to_html_document(black_box(conversion));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_conversion, bench_html_document);
criterion_main!(benches);
