mod common;

use common::{hex_image, read_blocks, read_nonempty_lines, temp_dir, write_file, write_hex};
use mergehex::{
    AddressError, AlignmentError, Block, Error, MergeError, PageKind, PageSize, ParseError,
    Record, merge_files, merge_inputs, parse_blocks,
};

fn size(n: u32) -> PageSize {
    PageSize::new(n).unwrap()
}

#[test]
fn test_single_zero_line_reproduced_exactly() {
    let dir = temp_dir();
    let input = dir.path().join("in.hex");
    let output = dir.path().join("out.hex");
    let text = ":1000000000000000000000000000000000000000F0\n:00000001FF\n";
    write_file(&input, text.as_bytes());

    let blocks = read_blocks(&input);
    assert_eq!(blocks, vec![Block::new(0, vec![0; 16])]);

    merge_files(&[&input], &output, size(1024)).unwrap();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), text);
}

#[test]
fn test_merge_alone_preserves_blocks() {
    let dir = temp_dir();
    let code: Vec<u8> = (0..0x900u32).map(|i| (i * 7) as u8).collect();
    let high: Vec<u8> = (0..0x30u8).collect();
    let input = write_hex(
        dir.path(),
        "app.hex",
        &[
            (0x0, code.clone()),
            (0x1000, vec![0xAA; 5]),
            (0x0002_0400, high.clone()),
        ],
    );
    let output = dir.path().join("out.hex");

    merge_files(&[&input], &output, size(0x400)).unwrap();

    assert_eq!(read_blocks(&output), read_blocks(&input));
    assert_eq!(
        read_blocks(&output),
        vec![
            Block::new(0x0, code),
            Block::new(0x1000, vec![0xAA; 5]),
            Block::new(0x0002_0400, high),
        ]
    );
}

#[test]
fn test_later_input_wins() {
    let dir = temp_dir();
    let a = write_hex(dir.path(), "a.hex", &[(0x400, vec![0xAA; 16])]);
    let b = write_hex(dir.path(), "b.hex", &[(0x400, vec![0xBB; 16])]);
    let out_ab = dir.path().join("ab.hex");
    let out_ba = dir.path().join("ba.hex");

    merge_files(&[&a, &b], &out_ab, size(0x400)).unwrap();
    merge_files(&[&b, &a], &out_ba, size(0x400)).unwrap();

    let expected_ab = vec![Block::new(0x400, vec![0xBB; 16])];
    let expected_ba = vec![Block::new(0x400, vec![0xAA; 16])];
    assert_eq!(read_blocks(&out_ab), expected_ab);
    assert_eq!(read_blocks(&out_ba), expected_ba);
}

#[test]
fn test_overwrite_replaces_whole_page() {
    let dir = temp_dir();
    let bootloader = write_hex(dir.path(), "boot.hex", &[(0x0, vec![0x11; 0x800])]);
    let patch = write_hex(dir.path(), "patch.hex", &[(0x400, vec![0x22; 0x10])]);

    let (pages, summary) = merge_inputs(&[&bootloader, &patch], size(0x400)).unwrap();

    assert_eq!(summary.inputs, 2);
    assert_eq!(summary.pages_read, 3);
    assert_eq!(summary.pages_replaced, 1);
    assert_eq!(pages.len(), 2);
    let first = pages.get(PageKind::Ordinary(0)).unwrap();
    let second = pages.get(PageKind::Ordinary(1)).unwrap();
    assert_eq!(first.data(), &[0x11; 0x400]);
    assert_eq!(second.data(), &[0x22; 0x10]);
}

#[test]
fn test_adjacent_records_form_one_block() {
    let text = ":0400000001020304F2\n:0400040005060708DE\n:00000001FF\n";
    assert_eq!(
        parse_blocks(text.as_bytes()).unwrap(),
        vec![Block::new(0, vec![1, 2, 3, 4, 5, 6, 7, 8])]
    );
}

#[test]
fn test_block_across_segment_boundary() {
    let dir = temp_dir();
    let input = dir.path().join("in.hex");
    let output = dir.path().join("out.hex");
    let mut text = Record::data(0xFFF0, &[0x5A; 0x20]).encode().unwrap();
    text += &Record::end_of_file().encode().unwrap();
    write_file(&input, text.as_bytes());
    let expected = vec![Block::new(0xFFF0, vec![0x5A; 0x20])];
    assert_eq!(read_blocks(&input), expected);

    merge_files(&[&input], &output, size(0x10)).unwrap();

    let lines = read_nonempty_lines(&output);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with(":10FFF000"));
    assert_eq!(lines[1], ":020000040001F9");
    assert!(lines[2].starts_with(":10000000"));
    assert_eq!(lines[3], ":00000001FF");
}

#[test]
fn test_special_register_merged_independently() {
    let dir = temp_dir();
    let app = write_hex(dir.path(), "app.hex", &[(0x0, vec![0x01; 0x10])]);
    let register = vec![0xDE, 0xAD, 0xBE, 0xEF];
    let uicr = write_hex(dir.path(), "uicr.hex", &[(0x1000_1080, register)]);
    let output = dir.path().join("out.hex");

    merge_files(&[&app, &uicr], &output, size(0x1000)).unwrap();

    assert_eq!(
        read_blocks(&output),
        vec![
            Block::new(0x0, vec![0x01; 0x10]),
            Block::new(0x1000_1080, vec![0xDE, 0xAD, 0xBE, 0xEF]),
        ]
    );
    let lines = read_nonempty_lines(&output);
    assert_eq!(lines[1], ":020000041000EA");
}

#[test]
fn test_special_register_wrong_length_rejected() {
    let dir = temp_dir();
    let uicr = write_hex(dir.path(), "uicr.hex", &[(0x1000_1080, vec![0; 5])]);
    let output = dir.path().join("out.hex");

    let err = merge_files(&[&uicr], &output, size(0x1000)).unwrap_err();
    assert!(matches!(
        err,
        Error::Merge {
            source: MergeError::Alignment(AlignmentError::SpecialRegister {
                address: 0x1000_1080,
                len: 5
            }),
            ..
        }
    ));
    assert!(!output.exists());
}

#[test]
fn test_unaligned_block_rejected() {
    let dir = temp_dir();
    let input = write_hex(dir.path(), "in.hex", &[(0x410, vec![0; 4])]);
    let output = dir.path().join("out.hex");

    let err = merge_files(&[&input], &output, size(0x400)).unwrap_err();
    assert!(matches!(
        err,
        Error::Merge {
            source: MergeError::Alignment(AlignmentError::Unaligned {
                address: 0x410,
                page_size: 0x400
            }),
            ..
        }
    ));
    assert!(err.to_string().contains("in.hex"));
}

#[test]
fn test_data_after_start_segment_rejected() {
    let dir = temp_dir();
    let input = dir.path().join("in.hex");
    write_file(
        &input,
        b":0400000300003800C1\n:0100000001FE\n:00000001FF\n",
    );
    let output = dir.path().join("out.hex");

    let err = merge_files(&[&input], &output, size(0x400)).unwrap_err();
    assert!(matches!(
        err,
        Error::Parse {
            source: ParseError::Address {
                line: 2,
                source: AddressError::BasePoisoned
            },
            ..
        }
    ));
}

#[test]
fn test_failure_leaves_existing_output() {
    let dir = temp_dir();
    let good = write_hex(dir.path(), "good.hex", &[(0x0, vec![0x01; 4])]);
    let bad = dir.path().join("bad.hex");
    write_file(&bad, b":0400000501020304F2\n");
    let output = dir.path().join("out.hex");
    write_file(&output, hex_image(&[(0x0, vec![0xEE; 4])]).as_bytes());

    let err = merge_files(&[&good, &bad], &output, size(0x400)).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(read_blocks(&output), vec![Block::new(0, vec![0xEE; 4])]);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}
