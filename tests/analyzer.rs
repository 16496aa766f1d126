use gox_analyzer::ast::Stmt;
use gox_analyzer::diagnostics::Phase;
use gox_analyzer::token::Kind;
use gox_analyzer::{analyze, tokenize};

const FACTORIZE: &str = r#"
const limit = 100;

func is_divisible(n int, d int) bool {
    return n % d == 0;
}

func factorize(n int) {
    var d int = 2;
    while (n > 1) {
        if (is_divisible(n, d)) {
            print d;
            n = n / d;
        } else {
            d = d + 1;
        }
    }
}

func main() {
    factorize(limit);
}
"#;

#[test]
fn realistic_program_parses_clean() {
    let (program, diags) = analyze(FACTORIZE);
    assert!(diags.is_empty(), "diagnostics: {:?}", diags);
    assert_eq!(program.decls.len(), 4);
    assert!(matches!(&program.decls[0], Stmt::ConstDecl { name, .. } if name == "limit"));
    assert!(matches!(&program.decls[3], Stmt::Function { name, .. } if name == "main"));
}

#[test]
fn every_input_ends_with_exactly_one_eof() {
    let inputs = [
        "",
        "var x = 1;",
        "\"unterminated",
        "@#\u{fffd}",
        "/* open comment",
        "1.2.3.4",
    ];
    for input in inputs {
        let (tokens, _) = tokenize(input);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == Kind::Eof).count(),
            1,
            "input {:?}",
            input
        );
        assert!(tokens.last().unwrap().is_eof(), "input {:?}", input);
    }
}

#[test]
fn retokenizing_is_deterministic() {
    for input in [FACTORIZE, "x = ;", "'a' 'bc' \"s\" 1.5 @"] {
        assert_eq!(tokenize(input), tokenize(input));
    }
}

#[test]
fn token_lexemes_match_their_spans() {
    let chars: Vec<char> = FACTORIZE.chars().collect();
    let (tokens, diags) = tokenize(FACTORIZE);
    assert!(diags.is_empty());
    let mut previous_end = 0;
    for token in &tokens {
        let start = token.span.start.offset;
        let end = token.span.end.offset;
        assert!(start >= previous_end, "overlapping token at {:?}", token);
        let text: String = chars[start..end].iter().collect();
        assert_eq!(text, token.lexeme);
        // Anything between tokens must be skipped trivia, never silently
        // dropped program text. FACTORIZE contains no comments, so the
        // gaps are pure whitespace.
        let gap: String = chars[previous_end..start].iter().collect();
        assert!(gap.chars().all(char::is_whitespace), "unexpected gap {:?}", gap);
        previous_end = end;
    }
}

#[test]
fn merged_diagnostics_are_in_source_order() {
    // A lexical error up front and a syntax error later on.
    let (_, diags) = analyze("@ ;\nx = ;");
    assert!(diags.len() >= 2);
    assert_eq!(diags[0].phase, Phase::Lexical);
    for pair in diags.windows(2) {
        assert!(pair[0].span.start.offset <= pair[1].span.start.offset);
    }
}

#[test]
fn errors_do_not_stop_the_pass() {
    let (program, diags) = analyze("x = ;\nfunc ok() { return 1; }\n\"oops");
    assert!(diags.iter().any(|d| d.is_error()));
    assert!(program
        .decls
        .iter()
        .any(|d| matches!(d, Stmt::Function { name, .. } if name == "ok")));
}

#[test]
fn ast_serializes_to_tagged_json() {
    let (program, diags) = analyze("func main() { print 1 + 2; }");
    assert!(diags.is_empty());
    let value = serde_json::to_value(&program).unwrap();
    let func = &value["decls"][0];
    assert_eq!(func["type"], "Function");
    assert_eq!(func["name"], "main");
    let print = &func["body"]["stmts"][0];
    assert_eq!(print["type"], "Print");
    assert_eq!(print["expr"]["type"], "Binary");
    assert_eq!(print["expr"]["op"], "Add");
}

#[test]
fn dump_renders_an_indented_tree() {
    let (program, diags) = analyze("x = 1 + 2 * 3;");
    assert!(diags.is_empty());
    let dump = program.dump();
    assert!(dump.starts_with("Program\n"));
    assert!(dump.contains("Assign(x)"));
    assert!(dump.contains("BinaryOp(+)"));
    assert!(dump.contains("BinaryOp(*)"));
    let plus_indent = dump
        .lines()
        .find(|l| l.contains("BinaryOp(+)"))
        .map(|l| l.len() - l.trim_start().len())
        .unwrap();
    let star_indent = dump
        .lines()
        .find(|l| l.contains("BinaryOp(*)"))
        .map(|l| l.len() - l.trim_start().len())
        .unwrap();
    assert!(star_indent > plus_indent);
}
