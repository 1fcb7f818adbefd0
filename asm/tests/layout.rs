use sm213asm::layout::{overlaps, Block};
use sm213asm::{assemble, Lexer, Output};

fn run(code: &str) -> Output {
    let tokens = Lexer::new(code).parse().unwrap();
    assemble(&tokens).unwrap()
}

fn block(start: u32, len: usize, fill: u8) -> Block {
    Block {
        start,
        bytes: vec![fill; len],
        origin: None,
    }
}

#[test]
fn later_block_wins() {
    let out = run(".pos 0x10\n.long 0x11111111\n.pos 0x12\n.long 0x22222222");
    assert_eq!(out.overlaps.len(), 1);
    assert_eq!(out.image.len(), 0x16);
    assert_eq!(&out.image[0x10..0x12], &[0x11, 0x11]);
    assert_eq!(&out.image[0x12..0x16], &[0x22, 0x22, 0x22, 0x22]);

    let overlap = &out.overlaps[0];
    assert_eq!((overlap.earlier.0, overlap.earlier.1), (0x10, 0x14));
    assert_eq!((overlap.later.0, overlap.later.1), (0x12, 0x16));
    assert_eq!(overlap.later.2.map(|p| p.line), Some(3));
}

#[test]
fn gaps_are_zero() {
    let out = run(".pos 4\nhalt");
    assert_eq!(out.image, vec![0x00, 0x00, 0x00, 0x00, 0xF0, 0x00]);
    assert!(out.overlaps.is_empty());
}

#[test]
fn empty_program() {
    let out = run("# nothing here\n");
    assert!(out.image.is_empty());
    assert!(out.overlaps.is_empty());
}

#[test]
fn empty_pos_block_is_ignored() {
    let out = run("halt\nnop\n.pos 0\n.pos 2\nhalt");
    assert_eq!(out.image, vec![0xF0, 0x00, 0xF0, 0x00]);
    assert_eq!(out.overlaps.len(), 1);
}

#[test]
fn overlap_shapes() {
    // prefix, suffix, containment, covering
    for (a, b) in [((4, 4), (2, 4)), ((4, 4), (6, 4)), ((4, 8), (6, 2)), ((6, 2), (4, 8))] {
        let found = overlaps(&[block(a.0, a.1, 1), block(b.0, b.1, 2)]);
        assert_eq!(found.len(), 1, "{:?} {:?}", a, b);
    }
}

#[test]
fn overlap_matches_shared_addresses() {
    for s1 in 0..6u32 {
        for l1 in 0..4usize {
            for s2 in 0..6u32 {
                for l2 in 0..4usize {
                    let shared = (s1..s1 + l1 as u32).any(|a| a >= s2 && a < s2 + l2 as u32);
                    let found = overlaps(&[block(s1, l1, 1), block(s2, l2, 2)]);
                    assert_eq!(!found.is_empty(), shared, "{s1}+{l1} / {s2}+{l2}");
                }
            }
        }
    }
}

#[test]
fn deterministic() {
    let code = "main: ld $data, r0\nld (r0), r1\nbeq r1, done\ninc r1\ndone: halt\n.pos 0x100\ndata: .long 5\n";
    let first = run(code).image;
    let second = run(code).image;
    assert_eq!(first, second);
    assert_eq!(&first[2..6], &[0x00, 0x00, 0x01, 0x00]);
}
