use indoc::indoc;

use crate::test_utils::{fix_app, lint_app};

#[test]
fn field_read() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) float64 {
        	return t.D
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"6:9: proto message field read without getter: "t.D" should be "t.GetD()""#);
}

#[test]
fn print_arguments_both_flagged() {
    let app = indoc! {r#"
        package app

        import (
        	"fmt"

        	"example.com/pb"
        )

        func run(t *pb.Test) {
        	fmt.Println(t.B, t.D)
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    10:14: proto message field read without getter: "t.B" should be "t.GetB()"
    10:19: proto message field read without getter: "t.D" should be "t.GetD()"
    "#);
}

#[test]
fn nested_chain_is_one_finding() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) string {
        	return t.Embedded.Embedded.S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"6:9: proto message field read without getter: "t.Embedded.Embedded.S" should be "t.GetEmbedded().GetEmbedded().GetS()""#);
}

#[test]
fn index_subscript_kept() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(many []*pb.Embedded, manyIndex int) (string, string) {
        	return many[0].S, many[manyIndex].S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    6:9: proto message field read without getter: "many[0].S" should be "many[0].GetS()"
    6:20: proto message field read without getter: "many[manyIndex].S" should be "many[manyIndex].GetS()"
    "#);
}

#[test]
fn existing_getter_in_chain() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(many []*pb.Embedded) string {
        	return many[0].GetEmbedded().Embedded.Embedded.S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"6:9: proto message field read without getter: "many[0].GetEmbedded().Embedded.Embedded.S" should be "many[0].GetEmbedded().GetEmbedded().GetEmbedded().GetS()""#);
}

#[test]
fn repeated_and_map_fields() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) (string, string) {
        	return t.Many[0].S, t.Labels["k"].S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    6:9: proto message field read without getter: "t.Many[0].S" should be "t.GetMany()[0].GetS()"
    6:22: proto message field read without getter: "t.Labels[\"k\"].S" should be "t.GetLabels()[\"k\"].GetS()"
    "#);
}

#[test]
fn writes_are_not_reads() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	t.B = true
        	t.D, t.S = 1, "x"
        	_, t.I32 = 0, 1
        	t.Embedded.S = "y"
        	t.I64 += 2
        	t.U32++
        	t.U64--
        }
    "#};

    assert_eq!(lint_app(app), "");
}

#[test]
fn address_of_is_not_a_read() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func fill(s *string) {}

        func run(t *pb.Test) {
        	fill(&t.S)
        	fill(&(t.S))
        	p := &t.Embedded
        	q := &((t.Embedded))
        	_, _ = p, q
        }
    "#};

    assert_eq!(lint_app(app), "");
    assert_eq!(fix_app(app), app);
}

#[test]
fn parenthesized_write_target() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	(t.S) = "x"
        	(t.I32)++
        }
    "#};

    assert_eq!(lint_app(app), "");
}

#[test]
fn blank_assignment_reads_right_side() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	_ = t.B
        	_, _ = t.F, t.I32
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    6:6: proto message field read without getter: "t.B" should be "t.GetB()"
    7:9: proto message field read without getter: "t.F" should be "t.GetF()"
    7:14: proto message field read without getter: "t.I32" should be "t.GetI32()"
    "#);
}

#[test]
fn getters_and_methods_untouched() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	_ = t.GetB()
        	_ = t.GetEmbedded().GetS()
        	reset := t.Reset
        	reset()
        	t.Reset()
        }
    "#};

    assert_eq!(lint_app(app), "");
}

#[test]
fn method_call_on_field() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) string {
        	return t.Embedded.GetS()
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"6:9: proto message field read without getter: "t.Embedded.GetS()" should be "t.GetEmbedded().GetS()""#);
}

#[test]
fn plain_structs_untouched() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        type Options struct {
        	Name string
        	Msg  *pb.Test
        }

        func run(o Options, p *Options) string {
        	return o.Name + p.Name + o.Msg.S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"11:27: proto message field read without getter: "o.Msg.S" should be "o.Msg.GetS()""#);
}

#[test]
fn free_function_result() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func newTest() *pb.Test {
        	return &pb.Test{}
        }

        func run() bool {
        	return newTest().B
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"10:9: proto message field read without getter: "newTest().B" should be "newTest().GetB()""#);
}

#[test]
fn locals_carry_message_types() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	e := t.GetEmbedded()
        	for _, m := range t.GetMany() {
        		_ = m.S
        	}
        	var x *pb.Embedded = e.Embedded
        	_ = x
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    8:7: proto message field read without getter: "m.S" should be "m.GetS()"
    10:23: proto message field read without getter: "e.Embedded" should be "e.GetEmbedded()"
    "#);
}

#[test]
fn compound_subscripts_are_one_edit() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test, i int) string {
        	e := t.Many[i+1].Embedded.S
        	return e + t.Many[t.I32].S
        }
    "#};

    insta::assert_snapshot!(lint_app(app), @r#"
    6:7: proto message field read without getter: "t.Many[i+1].Embedded.S" should be "t.GetMany()[i+1].GetEmbedded().GetS()"
    7:13: proto message field read without getter: "t.Many[t.I32].S" should be "t.GetMany()[t.GetI32()].GetS()"
    "#);

    let fixed = fix_app(app);
    assert_eq!(
        fixed,
        indoc! {r#"
            package app

            import "example.com/pb"

            func run(t *pb.Test, i int) string {
            	e := t.GetMany()[i+1].GetEmbedded().GetS()
            	return e + t.GetMany()[t.GetI32()].GetS()
            }
        "#}
    );
    assert_eq!(lint_app(&fixed), "");
}

#[test]
fn generic_results_are_not_resolved() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func first[T any](xs []T) T {
        	return xs[0]
        }

        func run(xs []*pb.Embedded) string {
        	m := first(xs)
        	return m.S
        }
    "#};

    assert_eq!(lint_app(app), "");
}

#[test]
fn values_are_not_pointers() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t pb.Test) bool {
        	return t.B
        }
    "#};

    assert_eq!(lint_app(app), "");
}

#[test]
fn fixes_rewrite_reads_only() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test, many []*pb.Embedded) string {
        	if t.B && t.Embedded.S != "" {
        		return many[0].GetEmbedded().Embedded.S
        	}
        	t.S = t.Embedded.Embedded.S
        	return t.Labels["k"].S
        }
    "#};

    let fixed = fix_app(app);

    assert_eq!(
        fixed,
        indoc! {r#"
            package app

            import "example.com/pb"

            func run(t *pb.Test, many []*pb.Embedded) string {
            	if t.GetB() && t.GetEmbedded().GetS() != "" {
            		return many[0].GetEmbedded().GetEmbedded().GetS()
            	}
            	t.S = t.GetEmbedded().GetEmbedded().GetS()
            	return t.GetLabels()["k"].GetS()
            }
        "#}
    );
    assert_eq!(lint_app(&fixed), "");
}

#[test]
fn anchors_are_unique() {
    let app = indoc! {r#"
        package app

        import "example.com/pb"

        func run(t *pb.Test) {
        	_ = t.Embedded.Embedded.S + t.Embedded.S + t.S
        	_ = t.Many[0].Embedded.GetS()
        }
    "#};

    let findings = lint_app(app);
    let anchors: Vec<&str> = findings
        .lines()
        .map(|line| line.split(": ").next().unwrap())
        .collect();
    let mut unique = anchors.clone();
    unique.dedup();

    assert_eq!(anchors.len(), 4);
    assert_eq!(anchors, unique);
}
