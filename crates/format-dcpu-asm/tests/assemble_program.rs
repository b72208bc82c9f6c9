use format_dcpu_asm::assemble;

#[test]
fn assembles_a_small_loop_with_forward_and_backward_labels() {
    let source = "\
:start
SET A, 0
:loop
ADD A, 1
IFN A, 10
SET PC, loop
SET PC, done
:done
SET B, A
";
    let words = assemble(source).expect("program should assemble");
    assert!(!words.is_empty());
    // SET B, A should be the final instruction: b=B(0x01), a=A(0x00), opcode SET(0x01)
    let last = *words.last().unwrap();
    assert_eq!(last & 0x1f, 0x01);
}

#[test]
fn dat_string_followed_by_a_zero_terminator() {
    let words = assemble("DAT \"Hi!\", 0\n").unwrap();
    assert_eq!(words, vec!['H' as u16, 'i' as u16, '!' as u16, 0]);
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let source = "; full line comment\n\nSET A, 1 ; trailing comment\n";
    let words = assemble(source).unwrap();
    assert_eq!(words.len(), 1);
}
