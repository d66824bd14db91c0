//! One test group per instruction family from spec §4.3's arity table,
//! mirroring `vcpu/src/test/instructions.rs`'s per-opcode layout.

use super::*;

#[test]
fn move_copies_type_and_value() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("5")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), var("GF@a")]),
        instr(5, "WRITE", vec![var("GF@b")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "5");
}

#[test]
fn type_on_undef_yields_empty_string() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "DEFVAR", vec![var("GF@t")]),
        instr(3, "TYPE", vec![var("GF@t"), var("GF@a")]),
        instr(4, "WRITE", vec![var("GF@t")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "");
}

#[test]
fn type_on_undeclared_variable_is_54() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@t")]),
        instr(2, "TYPE", vec![var("GF@t"), var("GF@nope")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 54);
}

#[test]
fn type_names_each_variant() {
    for (arg, expected) in [
        (int("1"), "int"),
        (string("s"), "string"),
        (boolean("true"), "bool"),
        (nil(), "nil"),
    ] {
        let program = vec![
            instr(1, "DEFVAR", vec![var("GF@a")]),
            instr(2, "MOVE", vec![var("GF@a"), arg]),
            instr(3, "DEFVAR", vec![var("GF@t")]),
            instr(4, "TYPE", vec![var("GF@t"), var("GF@a")]),
            instr(5, "WRITE", vec![var("GF@t")]),
        ];
        let (code, stdout, _) = run(program, "");
        assert_eq!(code, 0);
        assert_eq!(stdout, expected);
    }
}

#[test]
fn arithmetic_family() {
    for (opcode, a, b, expected) in [
        ("ADD", 7, 5, 12),
        ("SUB", 7, 5, 2),
        ("MUL", 7, 5, 35),
        ("IDIV", 7, 2, 3),
    ] {
        let program = vec![
            instr(1, "DEFVAR", vec![var("GF@a")]),
            instr(2, "MOVE", vec![var("GF@a"), int(&a.to_string())]),
            instr(3, "DEFVAR", vec![var("GF@b")]),
            instr(4, "MOVE", vec![var("GF@b"), int(&b.to_string())]),
            instr(5, "DEFVAR", vec![var("GF@r")]),
            instr(6, opcode, vec![var("GF@r"), var("GF@a"), var("GF@b")]),
            instr(7, "WRITE", vec![var("GF@r")]),
        ];
        let (code, stdout, _) = run(program, "");
        assert_eq!(code, 0, "{opcode}");
        assert_eq!(stdout, expected.to_string(), "{opcode}");
    }
}

#[test]
fn arithmetic_type_mismatch_is_53() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), boolean("true")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), int("1")]),
        instr(5, "DEFVAR", vec![var("GF@r")]),
        instr(6, "ADD", vec![var("GF@r"), var("GF@a"), var("GF@b")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 53);
}

#[test]
fn comparisons() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("3")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), int("5")]),
        instr(5, "DEFVAR", vec![var("GF@lt")]),
        instr(6, "LT", vec![var("GF@lt"), var("GF@a"), var("GF@b")]),
        instr(7, "WRITE", vec![var("GF@lt")]),
        instr(8, "DEFVAR", vec![var("GF@gt")]),
        instr(9, "GT", vec![var("GF@gt"), var("GF@a"), var("GF@b")]),
        instr(10, "WRITE", vec![var("GF@gt")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "truefalse");
}

#[test]
fn string_ordering_is_lexicographic_over_code_points() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), string("abc")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), string("abd")]),
        instr(5, "DEFVAR", vec![var("GF@lt")]),
        instr(6, "LT", vec![var("GF@lt"), var("GF@a"), var("GF@b")]),
        instr(7, "WRITE", vec![var("GF@lt")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "true");
}

#[test]
fn lt_on_nil_is_53() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), nil()]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), nil()]),
        instr(5, "DEFVAR", vec![var("GF@lt")]),
        instr(6, "LT", vec![var("GF@lt"), var("GF@a"), var("GF@b")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 53);
}

#[test]
fn eq_tolerates_nil_on_either_side() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), nil()]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), int("1")]),
        instr(5, "DEFVAR", vec![var("GF@eq1")]),
        instr(6, "EQ", vec![var("GF@eq1"), var("GF@a"), var("GF@b")]),
        instr(7, "WRITE", vec![var("GF@eq1")]),
        instr(8, "DEFVAR", vec![var("GF@c")]),
        instr(9, "MOVE", vec![var("GF@c"), nil()]),
        instr(10, "DEFVAR", vec![var("GF@eq2")]),
        instr(11, "EQ", vec![var("GF@eq2"), var("GF@a"), var("GF@c")]),
        instr(12, "WRITE", vec![var("GF@eq2")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "falsetrue");
}

#[test]
fn eq_on_mismatched_non_nil_types_is_53() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("1")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), string("1")]),
        instr(5, "DEFVAR", vec![var("GF@eq")]),
        instr(6, "EQ", vec![var("GF@eq"), var("GF@a"), var("GF@b")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 53);
}

#[test]
fn logic_family() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@t")]),
        instr(2, "MOVE", vec![var("GF@t"), boolean("true")]),
        instr(3, "DEFVAR", vec![var("GF@f")]),
        instr(4, "MOVE", vec![var("GF@f"), boolean("false")]),
        instr(5, "DEFVAR", vec![var("GF@and")]),
        instr(6, "AND", vec![var("GF@and"), var("GF@t"), var("GF@f")]),
        instr(7, "WRITE", vec![var("GF@and")]),
        instr(8, "DEFVAR", vec![var("GF@or")]),
        instr(9, "OR", vec![var("GF@or"), var("GF@t"), var("GF@f")]),
        instr(10, "WRITE", vec![var("GF@or")]),
        instr(11, "DEFVAR", vec![var("GF@not")]),
        instr(12, "NOT", vec![var("GF@not"), var("GF@t")]),
        instr(13, "WRITE", vec![var("GF@not")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "falsetruefalse");
}

#[test]
fn logic_rejects_non_bool_operands() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("1")]),
        instr(3, "DEFVAR", vec![var("GF@not")]),
        instr(4, "NOT", vec![var("GF@not"), var("GF@a")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 53);
}

#[test]
fn int2char_and_stri2int_roundtrip() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@ch")]),
        instr(2, "INT2CHAR", vec![var("GF@ch"), int("65")]),
        instr(3, "WRITE", vec![var("GF@ch")]),
        instr(4, "DEFVAR", vec![var("GF@back")]),
        instr(
            5,
            "STRI2INT",
            vec![var("GF@back"), var("GF@ch"), int("0")],
        ),
        instr(6, "WRITE", vec![var("GF@back")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "A65");
}

#[test]
fn int2char_out_of_range_is_58() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@ch")]),
        instr(2, "INT2CHAR", vec![var("GF@ch"), int("-1")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 58);
}

#[test]
fn stri2int_negative_index_is_58() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hi")]),
        instr(3, "DEFVAR", vec![var("GF@c")]),
        instr(4, "STRI2INT", vec![var("GF@c"), var("GF@s"), int("-1")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 58);
}

#[test]
fn concat_joins_strings() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), string("foo")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), string("bar")]),
        instr(5, "DEFVAR", vec![var("GF@c")]),
        instr(6, "CONCAT", vec![var("GF@c"), var("GF@a"), var("GF@b")]),
        instr(7, "WRITE", vec![var("GF@c")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "foobar");
}

#[test]
fn getchar_reads_code_point_at_index() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hello")]),
        instr(3, "DEFVAR", vec![var("GF@c")]),
        instr(4, "GETCHAR", vec![var("GF@c"), var("GF@s"), int("1")]),
        instr(5, "WRITE", vec![var("GF@c")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "e");
}

#[test]
fn setchar_replaces_one_code_point() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hello")]),
        instr(3, "SETCHAR", vec![var("GF@s"), int("0"), string("J")]),
        instr(4, "WRITE", vec![var("GF@s")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "Jello");
}

#[test]
fn setchar_uses_only_first_code_point_of_source() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hello")]),
        instr(3, "SETCHAR", vec![var("GF@s"), int("0"), string("XYZ")]),
        instr(4, "WRITE", vec![var("GF@s")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "Xello");
}

#[test]
fn setchar_with_empty_source_is_58() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hello")]),
        instr(3, "SETCHAR", vec![var("GF@s"), int("0"), string("")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 58);
}

#[test]
fn setchar_out_of_range_index_is_58() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("hi")]),
        instr(3, "SETCHAR", vec![var("GF@s"), int("9"), string("x")]),
    ];

    let (code, ..) = run(program, "");
    assert_eq!(code, 58);
}

#[test]
fn strlen_counts_code_points_not_bytes() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@s")]),
        instr(2, "MOVE", vec![var("GF@s"), string("caf\\233")]),
        instr(3, "DEFVAR", vec![var("GF@n")]),
        instr(4, "STRLEN", vec![var("GF@n"), var("GF@s")]),
        instr(5, "WRITE", vec![var("GF@n")]),
    ];

    // "caf\233" decodes the \233 escape to U+00E9 (é), so the string is
    // "café" — 4 code points, not the 5 bytes UTF-8 would take.
    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "4");
}

#[test]
fn read_int_parses_grammar_and_eof_yields_nil() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "READ", vec![var("GF@a"), ty("int")]),
        instr(3, "WRITE", vec![var("GF@a")]),
        instr(4, "DEFVAR", vec![var("GF@b")]),
        instr(5, "READ", vec![var("GF@b"), ty("int")]),
        instr(6, "DEFVAR", vec![var("GF@t")]),
        instr(7, "TYPE", vec![var("GF@t"), var("GF@b")]),
        instr(8, "WRITE", vec![var("GF@t")]),
    ];

    let (code, stdout, _) = run(program, "42\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "42nil");
}

#[test]
fn read_bool_is_case_insensitive_true_else_false() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "READ", vec![var("GF@a"), ty("bool")]),
        instr(3, "WRITE", vec![var("GF@a")]),
        instr(4, "DEFVAR", vec![var("GF@b")]),
        instr(5, "READ", vec![var("GF@b"), ty("bool")]),
        instr(6, "WRITE", vec![var("GF@b")]),
        instr(7, "DEFVAR", vec![var("GF@c")]),
        instr(8, "READ", vec![var("GF@c"), ty("bool")]),
        instr(9, "WRITE", vec![var("GF@c")]),
    ];

    let (code, stdout, _) = run(program, "TRUE\nnonsense\nfalse\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "truefalsefalse");
}

#[test]
fn read_string_empty_line_is_empty_string_not_nil() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "READ", vec![var("GF@a"), ty("string")]),
        instr(3, "DEFVAR", vec![var("GF@t")]),
        instr(4, "TYPE", vec![var("GF@t"), var("GF@a")]),
        instr(5, "WRITE", vec![var("GF@t")]),
        instr(6, "WRITE", vec![var("GF@a")]),
    ];

    let (code, stdout, _) = run(program, "\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "string");
}

#[test]
fn read_malformed_int_yields_nil() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "READ", vec![var("GF@a"), ty("int")]),
        instr(3, "DEFVAR", vec![var("GF@t")]),
        instr(4, "TYPE", vec![var("GF@t"), var("GF@a")]),
        instr(5, "WRITE", vec![var("GF@t")]),
    ];

    let (code, stdout, _) = run(program, "not-a-number\n");
    assert_eq!(code, 0);
    assert_eq!(stdout, "nil");
}

#[test]
fn jumpifeq_and_jumpifneq() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("1")]),
        instr(3, "DEFVAR", vec![var("GF@b")]),
        instr(4, "MOVE", vec![var("GF@b"), int("1")]),
        instr(5, "JUMPIFNEQ", vec![label("skip"), var("GF@a"), var("GF@b")]),
        instr(6, "WRITE", vec![string("eq")]),
        instr(7, "LABEL", vec![label("skip")]),
        instr(8, "JUMPIFEQ", vec![label("end"), var("GF@a"), var("GF@b")]),
        instr(9, "WRITE", vec![string("unreached")]),
        instr(10, "LABEL", vec![label("end")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "eq");
}

#[test]
fn pushs_pops_roundtrip_preserves_type() {
    let program = vec![
        instr(1, "PUSHS", vec![boolean("true")]),
        instr(2, "DEFVAR", vec![var("GF@x")]),
        instr(3, "POPS", vec![var("GF@x")]),
        instr(4, "DEFVAR", vec![var("GF@t")]),
        instr(5, "TYPE", vec![var("GF@t"), var("GF@x")]),
        instr(6, "WRITE", vec![var("GF@t")]),
        instr(7, "WRITE", vec![var("GF@x")]),
    ];

    let (code, stdout, _) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "booltrue");
}

#[test]
fn break_writes_diagnostics_and_continues() {
    let program = vec![
        instr(1, "DEFVAR", vec![var("GF@a")]),
        instr(2, "MOVE", vec![var("GF@a"), int("1")]),
        instr(3, "BREAK", vec![]),
        instr(4, "WRITE", vec![var("GF@a")]),
    ];

    let (code, stdout, stderr) = run(program, "");
    assert_eq!(code, 0);
    assert_eq!(stdout, "1");
    assert!(!stderr.is_empty());
}
