// ABOUTME: PPTX generation module for the quiz-slides application
// ABOUTME: Serialises a composed presentation into an Office Open XML package

use crate::deck::{Alignment, Anchor, Picture, Presentation, Shape, Slide, TextBox, TextRun};
use crate::errors::{Result, SlideError};
use crate::media::MediaFormat;
use crate::utils::prepare_output_path;
use log::{debug, info, warn};
use quick_xml::escape::escape;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::{ZipWriter, write::FileOptions};

const NS_DECL: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// Write `deck` to `output_file`.
///
/// The package is built in a temporary sibling file and renamed into place, so a failed run
/// never leaves a truncated deck behind.
pub fn write_pptx(deck: &Presentation, output_file: &Path) -> Result<()> {
    info!("Generating PPTX with {} slides", deck.slide_count());

    prepare_output_path(output_file)?;

    let temp_path = temp_sibling(output_file);
    let written = fs::File::create(&temp_path)
        .map_err(SlideError::FileReadError)
        .and_then(|file| write_package(deck, file));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            warn!("Failed to clean up temp file {:?}: {}", temp_path, cleanup);
        }
        return Err(e);
    }

    fs::rename(&temp_path, output_file).map_err(SlideError::FileReadError)?;
    info!("PPTX file created at {:?}", output_file);
    Ok(())
}

fn temp_sibling(output_file: &Path) -> PathBuf {
    let name = output_file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "deck.pptx".to_string());
    output_file.with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
}

/// Write the whole package into any seekable sink.
pub fn write_package<W: Write + Seek>(deck: &Presentation, sink: W) -> Result<()> {
    let mut zip = ZipWriter::new(sink);
    let slide_count = deck.slide_count();

    // Add [Content_Types].xml
    debug!("Creating PPTX structure: [Content_Types].xml");
    zip.start_file("[Content_Types].xml", FileOptions::default())?;
    zip.write_all(content_types_xml(slide_count).as_bytes())?;

    // Add _rels/.rels
    debug!("Creating PPTX structure: _rels/.rels");
    zip.start_file("_rels/.rels", FileOptions::default())?;
    let rels = format!(
        r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
    );
    zip.write_all(rels.as_bytes())?;

    // Add docProps/app.xml
    debug!("Creating PPTX structure: docProps/app.xml");
    zip.start_file("docProps/app.xml", FileOptions::default())?;
    let app_xml = format!(
        r#"{XML_HEADER}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
    <Application>quiz-slides</Application>
    <Slides>{slide_count}</Slides>
</Properties>"#
    );
    zip.write_all(app_xml.as_bytes())?;

    // Add docProps/core.xml
    debug!("Creating PPTX structure: docProps/core.xml");
    zip.start_file("docProps/core.xml", FileOptions::default())?;
    let core_xml = format!(
        r#"{XML_HEADER}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:title>{}</dc:title>
    <dc:creator>quiz-slides</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
    <cp:revision>1</cp:revision>
</cp:coreProperties>"#,
        xml_text(&deck.title),
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
    zip.write_all(core_xml.as_bytes())?;

    // Add ppt/_rels/presentation.xml.rels
    debug!("Creating PPTX structure: ppt/_rels/presentation.xml.rels");
    zip.start_file("ppt/_rels/presentation.xml.rels", FileOptions::default())?;
    zip.write_all(presentation_rels_xml(slide_count).as_bytes())?;

    // Add ppt/presentation.xml
    debug!("Creating PPTX structure: ppt/presentation.xml");
    zip.start_file("ppt/presentation.xml", FileOptions::default())?;
    zip.write_all(presentation_xml(deck).as_bytes())?;

    // Master, layout and theme every slide hangs off
    zip.start_file("ppt/slideMasters/slideMaster1.xml", FileOptions::default())?;
    zip.write_all(SLIDE_MASTER_XML.as_bytes())?;
    zip.start_file(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        FileOptions::default(),
    )?;
    zip.write_all(
        relationships(&[
            (REL_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
            (REL_THEME, "../theme/theme1.xml".to_string()),
        ])
        .as_bytes(),
    )?;
    zip.start_file("ppt/slideLayouts/slideLayout1.xml", FileOptions::default())?;
    zip.write_all(SLIDE_LAYOUT_XML.as_bytes())?;
    zip.start_file(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        FileOptions::default(),
    )?;
    zip.write_all(
        relationships(&[(REL_MASTER, "../slideMasters/slideMaster1.xml".to_string())])
            .as_bytes(),
    )?;
    zip.start_file("ppt/theme/theme1.xml", FileOptions::default())?;
    zip.write_all(THEME_XML.as_bytes())?;

    // Process each slide
    let mut image_counter = 0;
    for (i, slide) in deck.slides().iter().enumerate() {
        let slide_num = i + 1;
        debug!("Creating slide XML: ppt/slides/slide{}.xml", slide_num);

        let mut slide_rels = vec![(REL_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string())];
        let mut picture_rids = Vec::new();
        for picture in slide.pictures() {
            image_counter += 1;
            let image_name = format!("image{}.{}", image_counter, picture.media.format.extension());

            debug!("Adding image to PPTX: ppt/media/{}", image_name);
            zip.start_file(format!("ppt/media/{}", image_name), FileOptions::default())?;
            zip.write_all(&picture.media.data)?;

            slide_rels.push((REL_IMAGE, format!("../media/{}", image_name)));
            picture_rids.push(format!("rId{}", slide_rels.len()));
        }

        zip.start_file(
            format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
            FileOptions::default(),
        )?;
        zip.write_all(relationships(&slide_rels).as_bytes())?;

        zip.start_file(
            format!("ppt/slides/slide{}.xml", slide_num),
            FileOptions::default(),
        )?;
        zip.write_all(slide_xml(slide, &picture_rids).as_bytes())?;
    }

    // Finalize the ZIP file
    debug!("Finalizing PPTX package");
    zip.finish()?;
    Ok(())
}

fn content_types_xml(slide_count: usize) -> String {
    let image_defaults = MediaFormat::ALL
        .iter()
        .map(|f| {
            format!(
                r#"    <Default Extension="{}" ContentType="{}"/>"#,
                f.extension(),
                f.content_type()
            )
        })
        .collect::<Vec<String>>()
        .join("\n");
    let slides = (1..=slide_count)
        .map(|n| {
            format!(
                r#"    <Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"{XML_HEADER}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="xml" ContentType="application/xml"/>
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
{image_defaults}
    <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
    <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
    <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
    <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
{slides}
</Types>"#
    )
}

/// rId1 is the master, rId2 the theme, slides start at rId3.
fn presentation_rels_xml(slide_count: usize) -> String {
    let mut targets = vec![
        (REL_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        (REL_THEME, "theme/theme1.xml".to_string()),
    ];
    for n in 1..=slide_count {
        targets.push((REL_SLIDE, format!("slides/slide{}.xml", n)));
    }
    relationships(&targets)
}

fn presentation_xml(deck: &Presentation) -> String {
    let slide_ids = (0..deck.slide_count())
        .map(|i| format!(r#"        <p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 3))
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        r#"{XML_HEADER}
<p:presentation {NS_DECL} saveSubsetFonts="1">
    <p:sldMasterIdLst>
        <p:sldMasterId id="2147483648" r:id="rId1"/>
    </p:sldMasterIdLst>
    <p:sldIdLst>
{slide_ids}
    </p:sldIdLst>
    <p:sldSz cx="{cx}" cy="{cy}"/>
    <p:notesSz cx="6858000" cy="9144000"/>
</p:presentation>"#,
        cx = deck.slide_width,
        cy = deck.slide_height
    )
}

/// Relationship part with ids rId1.. in the given order.
fn relationships(targets: &[(&str, String)]) -> String {
    let mut xml = format!(
        "{XML_HEADER}\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\n"
    );
    for (i, (kind, target)) in targets.iter().enumerate() {
        xml.push_str(&format!(
            r#"    <Relationship Id="rId{}" Type="{}" Target="{}"/>"#,
            i + 1,
            kind,
            target
        ));
        xml.push('\n');
    }
    xml.push_str("</Relationships>");
    xml
}

/// Slide part. `picture_rids` holds the relationship id of each picture, in shape order.
fn slide_xml(slide: &Slide, picture_rids: &[String]) -> String {
    let mut xml = format!("{XML_HEADER}\n<p:sld {NS_DECL}>");
    xml.push_str("<p:cSld>");
    xml.push_str(&format!(
        r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        slide.background
    ));
    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    let mut rids = picture_rids.iter();
    for (i, shape) in slide.shapes().iter().enumerate() {
        // id 1 belongs to the group
        let shape_id = i + 2;
        match shape {
            Shape::TextBox(text_box) => write_text_box(&mut xml, shape_id, text_box),
            Shape::Picture(picture) => match rids.next() {
                Some(rid) => write_picture(&mut xml, shape_id, picture, rid),
                None => warn!("Picture {} has no relationship, skipping", shape_id),
            },
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn write_text_box(xml: &mut String, shape_id: usize, text_box: &TextBox) {
    let rect = text_box.rect;
    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(&format!(
        r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
        shape_id,
        shape_id - 1
    ));
    xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

    xml.push_str("<p:spPr><a:xfrm>");
    xml.push_str(&format!(r#"<a:off x="{}" y="{}"/>"#, rect.left, rect.top));
    xml.push_str(&format!(r#"<a:ext cx="{}" cy="{}"/>"#, rect.width, rect.height));
    xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    xml.push_str("<p:txBody>");
    xml.push_str(&format!(
        r#"<a:bodyPr wrap="{}" rtlCol="0" anchor="{}">"#,
        if text_box.word_wrap { "square" } else { "none" },
        match text_box.anchor {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
        }
    ));
    xml.push_str("<a:spAutoFit/></a:bodyPr><a:lstStyle/><a:p>");

    if text_box.alignment == Some(Alignment::Center) {
        xml.push_str(r#"<a:pPr algn="ctr"/>"#);
    }

    for run in &text_box.runs {
        write_run(xml, run);
    }

    xml.push_str("</a:p></p:txBody></p:sp>");
}

/// Emit one styled run. Line feeds become `<a:br>` carrying the same properties.
fn write_run(xml: &mut String, run: &TextRun) {
    let props = run_properties(run);
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str(&format!("<a:br>{}</a:br>", props));
        }
        if line.is_empty() {
            continue;
        }
        xml.push_str("<a:r>");
        xml.push_str(&props);
        xml.push_str(&format!("<a:t>{}</a:t>", xml_text(line)));
        xml.push_str("</a:r>");
    }
}

fn run_properties(run: &TextRun) -> String {
    let mut props = format!(
        r#"<a:rPr lang="ko-KR" altLang="en-US" sz="{}" b="{}""#,
        run.size.hundredths(),
        if run.bold { 1 } else { 0 }
    );
    if run.underline {
        props.push_str(r#" u="sng""#);
    }
    props.push_str(r#" dirty="0">"#);
    props.push_str(&format!(
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        run.color
    ));
    let typeface = xml_text(&run.font);
    props.push_str(&format!(
        r#"<a:latin typeface="{0}"/><a:ea typeface="{0}"/>"#,
        typeface
    ));
    props.push_str("</a:rPr>");
    props
}

fn write_picture(xml: &mut String, shape_id: usize, picture: &Picture, rid: &str) {
    let rect = picture.rect;
    xml.push_str("<p:pic><p:nvPicPr>");
    xml.push_str(&format!(
        r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
        shape_id,
        shape_id - 1,
        xml_text(&picture.description)
    ));
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    xml.push_str(&format!(
        r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
        rid
    ));
    xml.push_str("<p:spPr><a:xfrm>");
    xml.push_str(&format!(r#"<a:off x="{}" y="{}"/>"#, rect.left, rect.top));
    xml.push_str(&format!(r#"<a:ext cx="{}" cy="{}"/>"#, rect.width, rect.height));
    xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
    xml.push_str("</p:pic>");
}

/// Escape text for XML, dropping characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    escape(&cleaned).into_owned()
}

fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        _ => !c.is_control(),
    }
}

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
    <p:cSld>
        <p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>
        <p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
        </p:spTree>
    </p:cSld>
    <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
    <p:sldLayoutIdLst>
        <p:sldLayoutId id="2147483649" r:id="rId1"/>
    </p:sldLayoutIdLst>
</p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1">
    <p:cSld name="Blank">
        <p:spTree>
            <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>
        </p:spTree>
    </p:cSld>
    <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Quiz">
    <a:themeElements>
        <a:clrScheme name="Quiz">
            <a:dk1><a:srgbClr val="000000"/></a:dk1>
            <a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
            <a:dk2><a:srgbClr val="44546A"/></a:dk2>
            <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
            <a:accent1><a:srgbClr val="00FFFF"/></a:accent1>
            <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
            <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
            <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
            <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
            <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
            <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
            <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
        </a:clrScheme>
        <a:fontScheme name="Quiz">
            <a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>
            <a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>
        </a:fontScheme>
        <a:fmtScheme name="Quiz">
            <a:fillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
            </a:fillStyleLst>
            <a:lnStyleLst>
                <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
                <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
            </a:lnStyleLst>
            <a:effectStyleLst>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
                <a:effectStyle><a:effectLst/></a:effectStyle>
            </a:effectStyleLst>
            <a:bgFillStyleLst>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
                <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
            </a:bgFillStyleLst>
        </a:fmtScheme>
    </a:themeElements>
</a:theme>"#;
