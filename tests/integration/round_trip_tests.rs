/*!
 * End-to-end script -> markup -> script tests
 */

use anyhow::Result;
use multilogue::file_utils::{FileManager, SCRIPT_EXTENSIONS};
use multilogue::{Transcoder, decode, encode};
use crate::common;

#[test]
fn test_roundTrip_withSampleScript_shouldBeLossless() {
    common::init_logging();
    assert_eq!(decode(&encode(common::SAMPLE_SCRIPT)), common::SAMPLE_SCRIPT);
}

#[test]
fn test_roundTrip_withThreeBlocks_shouldPreserveOrderBothWays() {
    let script = "Cleo: first\n\nAnn: second\n\nBen: third\n\n";
    let markup = encode(script);

    let lines: Vec<&str> = markup.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(">Cleo<"));
    assert!(lines[1].contains(">Ann<"));
    assert!(lines[2].contains(">Ben<"));

    assert_eq!(decode(&markup), script);
}

#[test]
fn test_roundTrip_withEntityLikeText_shouldSurvive() {
    let script = "Ann: write &amp; literally, and 1 < 2\n\n";
    assert_eq!(decode(&encode(script)), script);
}

#[test]
fn test_roundTrip_withMessyScript_shouldNormalizeOnce() {
    let messy = "Title of the play\n\n  Ann :  hello  \r\n\r\nBen:\tbye\n\nstray tail";
    let normalized = decode(&encode(messy));

    assert_eq!(normalized, "Ann: hello\n\nBen: bye\n\n");
    // A second pass is a fixed point
    assert_eq!(decode(&encode(&normalized)), normalized);
}

#[test]
fn test_roundTrip_withMarkupFromElsewhere_shouldStabilizeAfterOneDecode() {
    let foreign = r#"<article>
  <p class="dialogue"><span class="speaker">Ann</span> Hello <i>you</i></p>
  <div class="dialogue">no speaker</div>
  <p class="dialogue"><span class="speaker">Ben</span>: Bye</p>
</article>"#;

    let script = decode(foreign);
    assert_eq!(script, "Ann: Hello you\n\nBen: Bye\n\n");
    assert_eq!(decode(&encode(&script)), script);
}

#[test]
fn test_roundTrip_withTypographicReferences_shouldStabilizeAfterOneDecode() {
    let foreign = "<!DOCTYPE html>\r\n<html><head><title>Act&nbsp;I</title></head><body>\r\n\
                   <p class=\"dialogue\"><span class=\"speaker\">Ann</span>: It&rsquo;s fine&hellip;</p>\r\n\
                   <p class=\"dialogue\"><span class=\"speaker\">Ben</span>: caf&eacute; &amp co</p>\r\n\
                   </body></html>";

    let script = decode(foreign);
    assert_eq!(script, "Ann: It\u{2019}s fine\u{2026}\n\nBen: caf\u{e9} & co\n\n");
    assert_eq!(decode(&encode(&script)), script);
}

#[test]
fn test_renderDirectory_shouldWriteMarkupNextToEachScript() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_script(dir, "one.txt")?;
    common::create_test_script(dir, "sub/two.plato")?;

    let transcoder = Transcoder::default();
    for script in FileManager::find_files(dir, &SCRIPT_EXTENSIONS)? {
        let output = FileManager::generate_output_path(&script, script.parent().unwrap(), "html");
        FileManager::write_to_file(&output, &transcoder.encode(&FileManager::read_to_string(&script)?))?;
    }

    assert_eq!(FileManager::read_to_string(dir.join("one.html"))?, common::SAMPLE_MARKUP);
    assert_eq!(
        decode(&FileManager::read_to_string(dir.join("sub").join("two.html"))?),
        common::SAMPLE_SCRIPT
    );
    Ok(())
}
