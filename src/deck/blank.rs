//! Built-in parts of a blank 4:3 deck.
//!
//! One master, one `type="blank"` layout without placeholders, a plain
//! Office theme and the property parts PowerPoint expects. No slides.

use super::opc::{content_type, reltype, ContentTypes, Relationships};
use super::package::{Package, CONTENT_TYPES_PART};

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

const PRESENTATION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldSz cx="9144000" cy="6858000" type="screen4x3"/><p:notesSz cx="6858000" cy="9144000"/><p:defaultTextStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:defaultTextStyle></p:presentation>"#;

const SLIDE_MASTER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900" algn="l"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle></p:txStyles></p:sldMaster>"#;

const SLIDE_LAYOUT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#;

const PRES_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;

const VIEW_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#;

const TABLE_STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}"/>"#;

const CORE_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Presentation</dc:title><dc:creator>pdf2pptx</dc:creator><cp:revision>1</cp:revision></cp:coreProperties>"#;

const APP_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>pdf2pptx</Application><PresentationFormat>On-screen Show (4:3)</PresentationFormat></Properties>"#;

/// A complete package for an empty deck.
pub fn blank_package() -> Package {
    let mut pkg = Package::new();

    let mut root_rels = Relationships::new();
    root_rels.add(reltype::OFFICE_DOCUMENT, PRESENTATION_PART);
    root_rels.add(reltype::CORE_PROPERTIES, "docProps/core.xml");
    root_rels.add(reltype::EXTENDED_PROPERTIES, "docProps/app.xml");
    pkg.set_part("_rels/.rels", root_rels.to_xml());

    let mut pres_rels = Relationships::new();
    pres_rels.add(reltype::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    pres_rels.add(reltype::THEME, "theme/theme1.xml");
    pres_rels.add(reltype::PRES_PROPS, "presProps.xml");
    pres_rels.add(reltype::VIEW_PROPS, "viewProps.xml");
    pres_rels.add(reltype::TABLE_STYLES, "tableStyles.xml");
    pkg.set_part("ppt/_rels/presentation.xml.rels", pres_rels.to_xml());

    let mut master_rels = Relationships::new();
    master_rels.add(reltype::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    master_rels.add(reltype::THEME, "../theme/theme1.xml");
    pkg.set_part(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        master_rels.to_xml(),
    );

    let mut layout_rels = Relationships::new();
    layout_rels.add(reltype::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
    pkg.set_part(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        layout_rels.to_xml(),
    );

    let parts: [(&str, &str, &str); 9] = [
        (PRESENTATION_PART, PRESENTATION_XML, content_type::PRESENTATION),
        ("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML, content_type::SLIDE_MASTER),
        ("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML, content_type::SLIDE_LAYOUT),
        ("ppt/theme/theme1.xml", THEME_XML, content_type::THEME),
        ("ppt/presProps.xml", PRES_PROPS_XML, content_type::PRES_PROPS),
        ("ppt/viewProps.xml", VIEW_PROPS_XML, content_type::VIEW_PROPS),
        ("ppt/tableStyles.xml", TABLE_STYLES_XML, content_type::TABLE_STYLES),
        ("docProps/core.xml", CORE_PROPS_XML, content_type::CORE_PROPERTIES),
        ("docProps/app.xml", APP_PROPS_XML, content_type::EXTENDED_PROPERTIES),
    ];

    let mut types = ContentTypes::new();
    types.ensure_default("rels", content_type::RELATIONSHIPS);
    types.ensure_default("xml", content_type::XML);
    for (name, xml, ct) in parts {
        pkg.set_part(name, xml);
        types.set_override(name, ct);
    }
    pkg.set_part(CONTENT_TYPES_PART, types.to_xml());

    pkg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::package::rels_part_name;

    #[test]
    fn every_relationship_target_exists() {
        let pkg = blank_package();
        for source in [
            "",
            PRESENTATION_PART,
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
        ] {
            let rels_xml = pkg.require(&rels_part_name(source)).unwrap();
            let rels = Relationships::parse(rels_xml, source).unwrap();
            for rel in rels.iter() {
                let target = crate::deck::package::resolve_target(source, &rel.target);
                assert!(pkg.contains(&target), "{source} → {target} missing");
            }
        }
    }

    #[test]
    fn every_xml_part_has_a_content_type() {
        let pkg = blank_package();
        let types = ContentTypes::parse(pkg.require(CONTENT_TYPES_PART).unwrap()).unwrap();
        for name in pkg.part_names().filter(|n| *n != CONTENT_TYPES_PART) {
            assert!(types.content_type_of(name).is_some(), "{name} untyped");
        }
        assert_eq!(
            types.content_type_of(PRESENTATION_PART),
            Some(content_type::PRESENTATION)
        );
    }
}
