//! PPTX generation from a laid-out deck.
//!
//! Every slide uses one blank layout; shapes carry their own positions.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::{Cursor, Seek, Write};

use aksara_core::ItemAlign;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::constants::*;
use crate::error::{PptxError, Result};
use crate::layout::font_size;
use crate::slide::{
    Deck, Frame, Paragraph, PictureShape, Shape, Slide, TableShape, TextBox, TextRun,
};

/// Turns a [`Deck`] into file bytes
pub trait DeckWriter {
    fn write(&self, deck: &Deck) -> Result<Vec<u8>>;
}

/// Writes decks as OOXML presentations
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxWriter;

impl DeckWriter for PptxWriter {
    fn write(&self, deck: &Deck) -> Result<Vec<u8>> {
        DeckPackage::new(deck).generate()
    }
}

const CODE_FONT: &str = "Consolas";

fn xml(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// One slide relationship
struct Rel {
    id: String,
    rel_type: &'static str,
    target: String,
    external: bool,
}

/// Relationships of one slide, numbered as they are requested
struct SlideRels {
    entries: Vec<Rel>,
}

impl SlideRels {
    fn new(slide_num: usize, has_notes: bool) -> Self {
        let mut rels = Self {
            entries: Vec::new(),
        };
        rels.push(REL_TYPE_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string(), false);
        if has_notes {
            rels.push(
                REL_TYPE_NOTES_SLIDE,
                format!("../notesSlides/notesSlide{slide_num}.xml"),
                false,
            );
        }
        rels
    }

    fn push(&mut self, rel_type: &'static str, target: String, external: bool) -> String {
        if let Some(rel) = self
            .entries
            .iter()
            .find(|rel| rel.rel_type == rel_type && rel.target == target)
        {
            return rel.id.clone();
        }
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Rel {
            id: id.clone(),
            rel_type,
            target,
            external,
        });
        id
    }

    fn image(&mut self, name: &str) -> String {
        self.push(REL_TYPE_IMAGE, format!("../media/{name}"), false)
    }

    fn link(&mut self, url: &str) -> String {
        self.push(REL_TYPE_HYPERLINK, url.to_string(), true)
    }

    fn to_xml(&self) -> String {
        let mut rels = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"{NS_PACKAGE_RELATIONSHIPS}\">\n"
        );
        for rel in &self.entries {
            let mode = if rel.external { " TargetMode=\"External\"" } else { "" };
            rels.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{mode}/>\n",
                rel.id,
                rel.rel_type,
                xml(&rel.target)
            ));
        }
        rels.push_str("</Relationships>");
        rels
    }
}

/// One deck being written
struct DeckPackage<'a> {
    deck: &'a Deck,
    has_notes: bool,
}

impl<'a> DeckPackage<'a> {
    fn new(deck: &'a Deck) -> Self {
        Self {
            deck,
            has_notes: deck.slides.iter().any(|s| s.notes.is_some()),
        }
    }

    fn lang(&self) -> &str {
        if self.deck.lang.is_empty() {
            "en-US"
        } else {
            &self.deck.lang
        }
    }

    fn generate(&self) -> Result<Vec<u8>> {
        if self.deck.slides.is_empty() {
            return Err(PptxError::EmptyDeck);
        }
        self.check_media()?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        self.write_content_types(&mut zip, options)?;
        self.write_root_rels(&mut zip, options)?;
        self.write_app_xml(&mut zip, options)?;
        self.write_core_xml(&mut zip, options)?;
        self.write_presentation_xml(&mut zip, options)?;
        self.write_presentation_rels(&mut zip, options)?;
        self.write_pres_props(&mut zip, options)?;
        self.write_table_styles(&mut zip, options)?;
        self.write_view_props(&mut zip, options)?;
        self.write_theme(&mut zip, options, 1)?;
        self.write_slide_master(&mut zip, options)?;
        self.write_slide_layout(&mut zip, options)?;
        if self.has_notes {
            self.write_theme(&mut zip, options, 2)?;
            self.write_notes_master(&mut zip, options)?;
        }

        for (i, slide) in self.deck.slides.iter().enumerate() {
            self.write_slide(&mut zip, options, i + 1, slide)?;
            if let Some(notes) = &slide.notes {
                self.write_notes_slide(&mut zip, options, i + 1, notes)?;
            }
        }

        for media in &self.deck.media {
            zip.start_file(format!("ppt/media/{}", media.name), options)?;
            zip.write_all(&media.data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn check_media(&self) -> Result<()> {
        let count = self.deck.media.len();
        for (i, slide) in self.deck.slides.iter().enumerate() {
            let mut referenced = slide.pictures().map(|p| p.media).chain(slide.background);
            if let Some(index) = referenced.find(|index| *index >= count) {
                return Err(PptxError::unknown_media(index, i + 1));
            }
        }
        Ok(())
    }

    /// Write [Content_Types].xml
    fn write_content_types<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{NS_CONTENT_TYPES}">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
"#
        );

        let extensions: BTreeSet<(&str, &str)> = self
            .deck
            .media
            .iter()
            .map(|m| (m.extension(), m.content_type.as_str()))
            .collect();
        let mut seen = BTreeSet::new();
        for (ext, content_type) in extensions {
            if seen.insert(ext) {
                content.push_str(&format!(
                    "  <Default Extension=\"{ext}\" ContentType=\"{content_type}\"/>\n"
                ));
            }
        }

        content.push_str(
            r#"  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>
  <Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/>
  <Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
        );

        if self.has_notes {
            content.push_str(
                r#"  <Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml"/>
"#,
            );
        }

        for (i, slide) in self.deck.slides.iter().enumerate() {
            content.push_str(&format!(
                "  <Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n",
                i + 1
            ));
            if slide.notes.is_some() {
                content.push_str(&format!(
                    "  <Override PartName=\"/ppt/notesSlides/notesSlide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>\n",
                    i + 1
                ));
            }
        }

        content.push_str("</Types>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write _rels/.rels
    fn write_root_rels<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("_rels/.rels", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write docProps/app.xml
    fn write_app_xml<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("docProps/app.xml", options)?;

        let notes = self
            .deck
            .slides
            .iter()
            .filter(|s| s.notes.is_some())
            .count();
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Application>aksara</Application>
  <PresentationFormat>Custom</PresentationFormat>
  <Slides>{}</Slides>
  <Notes>{}</Notes>
  <HiddenSlides>0</HiddenSlides>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>16.0000</AppVersion>
</Properties>"#,
            self.deck.slides.len(),
            notes
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write docProps/core.xml
    fn write_core_xml<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("docProps/core.xml", options)?;

        let title = self.deck.title.as_deref().unwrap_or("Presentation");
        let mut props = format!("  <dc:title>{}</dc:title>\n", xml(title));
        if let Some(author) = &self.deck.author {
            props.push_str(&format!(
                "  <dc:creator>{0}</dc:creator>\n  <cp:lastModifiedBy>{0}</cp:lastModifiedBy>\n",
                xml(author)
            ));
        }
        if let Some(subject) = &self.deck.subject {
            props.push_str(&format!("  <dc:subject>{}</dc:subject>\n", xml(subject)));
        }
        if let Some(keywords) = &self.deck.keywords {
            props.push_str(&format!("  <cp:keywords>{}</cp:keywords>\n", xml(keywords)));
        }

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
{props}</cp:coreProperties>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/presentation.xml
    fn write_presentation_xml<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/presentation.xml", options)?;

        let (cx, cy) = self.deck.size;
        let slide_count = self.deck.slides.len();

        let mut slide_refs = String::new();
        for i in 1..=slide_count {
            // rId1=slideMaster, rId2=presProps, rId3=theme, rId4+=slides
            slide_refs.push_str(&format!(
                "    <p:sldId id=\"{}\" r:id=\"rId{}\"/>\n",
                255 + i,
                i + 3
            ));
        }

        let notes_master = if self.has_notes {
            format!(
                "  <p:notesMasterIdLst>\n    <p:notesMasterId r:id=\"rId{}\"/>\n  </p:notesMasterIdLst>\n",
                slide_count + 4
            )
        } else {
            String::new()
        };

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="2147483648" r:id="rId1"/>
  </p:sldMasterIdLst>
{notes_master}  <p:sldIdLst>
{slide_refs}  </p:sldIdLst>
  <p:sldSz cx="{cx}" cy="{cy}"/>
  <p:notesSz cx="{cy}" cy="{cx}"/>
</p:presentation>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/_rels/presentation.xml.rels
    fn write_presentation_rels<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;

        let mut rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_MASTER}" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps" Target="presProps.xml"/>
  <Relationship Id="rId3" Type="{REL_TYPE_THEME}" Target="theme/theme1.xml"/>
"#
        );

        let slide_count = self.deck.slides.len();
        for i in 1..=slide_count {
            rels.push_str(&format!(
                "  <Relationship Id=\"rId{}\" Type=\"{REL_TYPE_SLIDE}\" Target=\"slides/slide{i}.xml\"/>\n",
                i + 3
            ));
        }
        if self.has_notes {
            rels.push_str(&format!(
                "  <Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster\" Target=\"notesMasters/notesMaster1.xml\"/>\n",
                slide_count + 4
            ));
        }

        rels.push_str("</Relationships>");
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write ppt/presProps.xml
    fn write_pres_props<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/presProps.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}"/>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/tableStyles.xml
    fn write_table_styles<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/tableStyles.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="{NS_DRAWING}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/viewProps.xml
    fn write_view_props<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/viewProps.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
</p:viewPr>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/theme/themeN.xml
    fn write_theme<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        number: usize,
    ) -> Result<()> {
        zip.start_file(format!("ppt/theme/theme{number}.xml"), options)?;

        let font = xml(&self.deck.font_face);
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_DRAWING}" name="aksara">
  <a:themeElements>
    <a:clrScheme name="aksara">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="1F2937"/></a:dk2>
      <a:lt2><a:srgbClr val="F3F4F6"/></a:lt2>
      <a:accent1><a:srgbClr val="2563EB"/></a:accent1>
      <a:accent2><a:srgbClr val="DB2777"/></a:accent2>
      <a:accent3><a:srgbClr val="9CA3AF"/></a:accent3>
      <a:accent4><a:srgbClr val="F59E0B"/></a:accent4>
      <a:accent5><a:srgbClr val="0EA5E9"/></a:accent5>
      <a:accent6><a:srgbClr val="16A34A"/></a:accent6>
      <a:hlink><a:srgbClr val="2563EB"/></a:hlink>
      <a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="aksara">
      <a:majorFont>
        <a:latin typeface="{font}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="{font}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="aksara">
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
</a:theme>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Write ppt/slideMasters/slideMaster1.xml
    fn write_slide_master<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="rId1"/>
  </p:sldLayoutIdLst>
</p:sldMaster>"#
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{REL_TYPE_THEME}" Target="../theme/theme1.xml"/>
</Relationships>"#
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write ppt/slideLayouts/slideLayout1.xml
    fn write_slide_layout<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}" type="blank" preserve="1">
  <p:cSld name="Blank">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_MASTER}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write ppt/notesMasters/notesMaster1.xml
    fn write_notes_master<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/notesMasters/notesMaster1.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notesMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
</p:notesMaster>"#
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/notesMasters/_rels/notesMaster1.xml.rels", options)?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="{REL_TYPE_THEME}" Target="../theme/theme2.xml"/>
</Relationships>"#
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    /// Write a single slide and its relationships
    fn write_slide<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide_num: usize,
        slide: &Slide,
    ) -> Result<()> {
        let mut rels = SlideRels::new(slide_num, slide.notes.is_some());
        let content = self.slide_xml(slide, &mut rels);

        zip.start_file(format!("ppt/slides/slide{slide_num}.xml"), options)?;
        zip.write_all(content.as_bytes())?;

        zip.start_file(format!("ppt/slides/_rels/slide{slide_num}.xml.rels"), options)?;
        zip.write_all(rels.to_xml().as_bytes())?;
        Ok(())
    }

    fn slide_xml(&self, slide: &Slide, rels: &mut SlideRels) -> String {
        let background = slide
            .background
            .and_then(|index| self.deck.media.get(index))
            .map(|media| {
                let id = rels.image(&media.name);
                format!(
                    "    <p:bg>\n      <p:bgPr>\n        <a:blipFill dpi=\"0\" rotWithShape=\"1\"><a:blip r:embed=\"{id}\"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill>\n        <a:effectLst/>\n      </p:bgPr>\n    </p:bg>\n"
                )
            })
            .unwrap_or_default();

        let mut shapes = String::new();
        for (i, shape) in slide.shapes.iter().enumerate() {
            // id 1 is the group shape
            let id = i + 2;
            match shape {
                Shape::Text(text) => shapes.push_str(&self.text_shape_xml(id, text, rels)),
                Shape::Table(table) => shapes.push_str(&self.table_xml(id, table)),
                Shape::Picture(picture) => shapes.push_str(&self.picture_xml(id, picture, rels)),
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
{background}    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
{shapes}    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#
        )
    }

    fn xfrm(frame: &Frame) -> String {
        format!(
            "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
            frame.x, frame.y, frame.cx, frame.cy
        )
    }

    /// Generate a text box shape
    fn text_shape_xml(&self, id: usize, text: &TextBox, rels: &mut SlideRels) -> String {
        let mut paragraphs = String::new();
        for paragraph in &text.paragraphs {
            paragraphs.push_str(&self.paragraph_xml(paragraph, text, rels));
        }
        if paragraphs.is_empty() {
            paragraphs = format!("          <a:p><a:endParaRPr lang=\"{}\"/></a:p>\n", self.lang());
        }

        format!(
            r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{id}" name="TextBox {id}"/>
          <p:cNvSpPr txBox="1"/>
          <p:nvPr/>
        </p:nvSpPr>
        <p:spPr>
          {}
          <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
          <a:noFill/>
        </p:spPr>
        <p:txBody>
          <a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr>
          <a:lstStyle/>
{paragraphs}        </p:txBody>
      </p:sp>
"#,
            Self::xfrm(&text.frame)
        )
    }

    fn paragraph_xml(&self, paragraph: &Paragraph, text: &TextBox, rels: &mut SlideRels) -> String {
        let algn = match text.align {
            ItemAlign::Left => "l",
            ItemAlign::Center => "ctr",
            ItemAlign::Right => "r",
        };
        let size = font_size(paragraph, text.font_size) * CENTIPOINTS_PER_POINT;

        let (ppr, runs) = match paragraph {
            Paragraph::Heading { runs, .. } => {
                let bold: Vec<TextRun> = runs
                    .iter()
                    .cloned()
                    .map(|mut r| {
                        r.bold = true;
                        r
                    })
                    .collect();
                (format!("<a:pPr algn=\"{algn}\"/>"), self.runs_xml(&bold, size, rels))
            }
            Paragraph::Text(runs) => (format!("<a:pPr algn=\"{algn}\"/>"), self.runs_xml(runs, size, rels)),
            Paragraph::Bullet {
                level,
                ordered,
                runs,
            } => {
                let margin = (*level as i64 + 1) * 342_900;
                let bullet = if *ordered {
                    "<a:buAutoNum type=\"arabicPeriod\"/>".to_string()
                } else {
                    "<a:buChar char=\"&#8226;\"/>".to_string()
                };
                (
                    format!(
                        "<a:pPr marL=\"{margin}\" lvl=\"{level}\" indent=\"-285750\" algn=\"{algn}\">{bullet}</a:pPr>"
                    ),
                    self.runs_xml(runs, size, rels),
                )
            }
            Paragraph::Code(line) => {
                let run = TextRun {
                    text: line.clone(),
                    monospace: true,
                    ..Default::default()
                };
                (
                    format!("<a:pPr algn=\"{algn}\"/>"),
                    self.runs_xml(std::slice::from_ref(&run), size, rels),
                )
            }
        };

        format!(
            "          <a:p>{ppr}{runs}<a:endParaRPr lang=\"{}\" sz=\"{size}\"/></a:p>\n",
            self.lang()
        )
    }

    /// Generate text runs
    fn runs_xml(&self, runs: &[TextRun], size: u32, rels: &mut SlideRels) -> String {
        let mut result = String::new();

        for run in runs {
            let mut rpr = format!("lang=\"{}\" sz=\"{size}\"", self.lang());
            if run.bold {
                rpr.push_str(" b=\"1\"");
            }
            if run.italic {
                rpr.push_str(" i=\"1\"");
            }
            if run.strike {
                rpr.push_str(" strike=\"sngStrike\"");
            }
            rpr.push_str(" dirty=\"0\"");

            let mut children = String::new();
            if run.monospace {
                children.push_str(&format!("<a:latin typeface=\"{CODE_FONT}\"/>"));
            }
            if let Some(url) = &run.link {
                let id = rels.link(url);
                children.push_str(&format!("<a:hlinkClick r:id=\"{id}\"/>"));
            }

            if !run.text.is_empty() {
                if children.is_empty() {
                    result.push_str(&format!(
                        "<a:r><a:rPr {rpr}/><a:t>{}</a:t></a:r>",
                        xml(&run.text)
                    ));
                } else {
                    result.push_str(&format!(
                        "<a:r><a:rPr {rpr}>{children}</a:rPr><a:t>{}</a:t></a:r>",
                        xml(&run.text)
                    ));
                }
            }
            if run.line_break {
                result.push_str(&format!("<a:br><a:rPr lang=\"{}\" sz=\"{size}\"/></a:br>", self.lang()));
            }
        }

        result
    }

    /// Generate a table graphic frame
    fn table_xml(&self, id: usize, table: &TableShape) -> String {
        let columns = table.column_count().max(1);
        let col_width = table.frame.cx / columns as i64;
        let row_count = table.rows.len() + usize::from(!table.header.is_empty());
        let row_height = table.frame.cy / row_count.max(1) as i64;

        let mut grid = String::new();
        for _ in 0..columns {
            grid.push_str(&format!("<a:gridCol w=\"{col_width}\"/>"));
        }

        let mut rows = String::new();
        let header = (!table.header.is_empty()).then_some((&table.header, true));
        let body = table.rows.iter().map(|row| (row, false));
        for (cells, is_header) in header.into_iter().chain(body) {
            rows.push_str(&format!("            <a:tr h=\"{row_height}\">"));
            for col in 0..columns {
                let text = cells.get(col).map(String::as_str).unwrap_or("");
                let bold = if is_header { " b=\"1\"" } else { "" };
                let run = if text.is_empty() {
                    String::new()
                } else {
                    format!(
                        "<a:r><a:rPr lang=\"{}\" sz=\"1400\"{bold} dirty=\"0\"/><a:t>{}</a:t></a:r>",
                        self.lang(),
                        xml(text)
                    )
                };
                rows.push_str(&format!(
                    "<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>{run}</a:p></a:txBody><a:tcPr/></a:tc>"
                ));
            }
            rows.push_str("</a:tr>\n");
        }

        let f = &table.frame;
        format!(
            r#"      <p:graphicFrame>
        <p:nvGraphicFramePr>
          <p:cNvPr id="{id}" name="Table {id}"/>
          <p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>
          <p:nvPr/>
        </p:nvGraphicFramePr>
        <p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>
        <a:graphic>
          <a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table">
            <a:tbl>
            <a:tblPr firstRow="1" bandRow="1"/>
            <a:tblGrid>{grid}</a:tblGrid>
{rows}            </a:tbl>
          </a:graphicData>
        </a:graphic>
      </p:graphicFrame>
"#,
            f.x, f.y, f.cx, f.cy
        )
    }

    /// Generate a picture shape
    fn picture_xml(&self, id: usize, picture: &PictureShape, rels: &mut SlideRels) -> String {
        let name = self
            .deck
            .media
            .get(picture.media)
            .map(|m| m.name.as_str())
            .unwrap_or_default();
        let rel = rels.image(name);

        format!(
            r#"      <p:pic>
        <p:nvPicPr>
          <p:cNvPr id="{id}" name="Picture {id}" descr="{}"/>
          <p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>
          <p:nvPr/>
        </p:nvPicPr>
        <p:blipFill>
          <a:blip r:embed="{rel}"/>
          <a:stretch><a:fillRect/></a:stretch>
        </p:blipFill>
        <p:spPr>
          {}
          <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
        </p:spPr>
      </p:pic>
"#,
            xml(&picture.description),
            Self::xfrm(&picture.frame)
        )
    }

    /// Write speaker notes slide
    fn write_notes_slide<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide_num: usize,
        notes: &str,
    ) -> Result<()> {
        zip.start_file(format!("ppt/notesSlides/notesSlide{slide_num}.xml"), options)?;

        let lang = self.lang();
        let paragraphs: String = notes
            .lines()
            .map(|line| {
                format!(
                    "          <a:p><a:r><a:rPr lang=\"{lang}\" dirty=\"0\"/><a:t>{}</a:t></a:r></a:p>\n",
                    xml(line)
                )
            })
            .collect();

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="2" name="Slide Image Placeholder 1"/>
          <p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="sldImg"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr/>
      </p:sp>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="3" name="Notes Placeholder 2"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="body" idx="1"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr/>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
{paragraphs}        </p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
</p:notes>"#
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file(
            format!("ppt/notesSlides/_rels/notesSlide{slide_num}.xml.rels"),
            options,
        )?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{NS_PACKAGE_RELATIONSHIPS}">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster" Target="../notesMasters/notesMaster1.xml"/>
  <Relationship Id="rId2" Type="{REL_TYPE_SLIDE}" Target="../slides/slide{slide_num}.xml"/>
</Relationships>"#
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }
}
