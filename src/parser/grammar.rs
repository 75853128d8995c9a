/*
 * ==========================================================================
 * RYE - A small functional scripting language
 * ==========================================================================
 *
 * File:      grammar.rs
 * Purpose:   The Rye grammar, expressed entirely in combinators. Built once
 *            per thread; cyclic non-terminals go through RuleRef slots that
 *            are defined after the rules that reference them.
 *
 * The expression grammar is a precedence cascade, low to high:
 *
 *   compound-expr (|> where map find fold)
 *   lambda | cond-else-expr
 *   postfix if/unless
 *   fallback (|)
 *   or, and, in
 *   equality, comparison
 *   sum, term, range
 *   prefix unary, power, postfix ?
 *   primary (calls, slices, bracket/field access)
 *   atoms and collections
 *
 * License:
 * This file is part of the Rye programming language project.
 *
 * Rye is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::ast::{NodeKind, NodeRef};
use crate::error::RyeError;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::builders::*;
use crate::parser::combinators::*;
use crate::parser::rewrite::implicit_lambda;
use crate::parser::state::{
    assign_operator, operator, operator_unary, token, ParseState, ParserRef, RuleRef,
};

pub struct Grammar {
    program: ParserRef,
    stmts: ParserRef,
}

thread_local! {
    static GRAMMAR: Grammar = Grammar::build();
}

/// Parses a token stream into a statement-chain AST.
pub fn parse(tokens: Vec<Token>) -> Result<NodeRef, RyeError> {
    GRAMMAR.with(|g| {
        let res = (g.program)(ParseState::start(tokens.clone()));
        if res.ok {
            return res
                .node
                .ok_or_else(|| RyeError::parse_error("Empty parse result", 0));
        }

        // Re-run the statement rule alone to locate the offending token.
        let partial = (g.stmts)(ParseState::start(tokens));
        let rest = if partial.ok {
            partial.rest.skip_newlines()
        } else {
            partial.rest
        };
        let (line, what) = match rest.first() {
            Some(t) => (t.line, t.kind.descriptor()),
            None => (0, "EOF"),
        };
        Err(RyeError::parse_error(
            format!("Unexpected {} token", what),
            line,
        ))
    })
}

impl Grammar {
    fn build() -> Grammar {
        // Cyclic non-terminals, addressable before their bodies exist.
        let r_expr = RuleRef::new();
        let r_simple_expr = RuleRef::new();
        let r_unary_pre = RuleRef::new();
        let r_cond_else_expr = RuleRef::new();
        let r_stmt = RuleRef::new();
        let r_stmts = RuleRef::new();
        let r_cond_stmt = RuleRef::new();

        let expr = r_expr.parser();
        let simple_expr = r_simple_expr.parser();
        let unary_pre = r_unary_pre.parser();
        let cond_else_expr = r_cond_else_expr.parser();
        let stmt = r_stmt.parser();
        let stmts = r_stmts.parser();
        let cond_stmt = r_cond_stmt.parser();

        // -----------------------------------------------------------------
        // Primaries and atoms
        // -----------------------------------------------------------------

        let p_group = in_parens(expr.clone());

        // `...expr` inside collection literals
        let p_splat = nest_right(
            then(
                token(TokenKind::DotDotDot, None),
                expr.clone(),
                Some(take_second()),
            ),
            NodeKind::Splat,
        );

        // Lists
        let p_list_item = either(p_splat.clone(), expr.clone());
        let p_list_items = then_maybe(
            listify(p_list_item.clone()),
            plus(
                then(
                    token(TokenKind::Comma, None),
                    p_list_item,
                    Some(take_second()),
                ),
                n_list_tail(),
            ),
            Some(n_list_head()),
        );
        let p_empty_list = then(
            token(TokenKind::LeftBracket, None),
            token(TokenKind::RightBracket, None),
            Some(n_empty_list()),
        );
        let p_list = choice(vec![
            p_empty_list,
            in_brackets(p_list_items),
        ]);

        // Objects
        let p_kv_key = choice(vec![
            token(TokenKind::Identifier, Some(n_identifier)),
            token(TokenKind::Str, Some(n_string)),
            p_group.clone(),
        ]);
        let p_kv_pair = then(
            p_kv_key,
            then(
                token(TokenKind::Colon, None),
                expr.clone(),
                Some(take_second()),
            ),
            Some(n_kv_pair()),
        );
        // The first item must be a key-value pair so that `{...x}` still
        // reads as a set spread; splats are welcome after it.
        let p_object_entry = nest_node(
            either(p_splat.clone(), p_kv_pair.clone()),
            NodeKind::ObjectItem,
        );
        let p_object_head = nest_node(p_kv_pair.clone(), NodeKind::ObjectItem);
        let p_object_items = then_maybe(
            skip_newlines(p_object_head),
            plus(
                then(
                    token(TokenKind::Comma, None),
                    skip_newlines(p_object_entry),
                    Some(take_second()),
                ),
                n_linked(),
            ),
            Some(n_rhs()),
        );
        let p_object = choice(vec![
            then(
                token(TokenKind::LeftBrace, None),
                skip_newlines(token(TokenKind::RightBrace, None)),
                Some(n_object()),
            ),
            then(
                token(TokenKind::LeftBrace, None),
                then(
                    p_object_items,
                    skip_newlines(token(TokenKind::RightBrace, None)),
                    Some(take_first()),
                ),
                Some(take_second()),
            ),
        ]);

        // Sets
        let p_set_entry = nest_node(
            either(p_splat.clone(), simple_expr.clone()),
            NodeKind::SetItem,
        );
        let p_set_items = comma_separated(skip_newlines(p_set_entry), n_linked(), n_rhs());
        let p_set = then(
            token(TokenKind::LeftBrace, None),
            then(
                p_set_items,
                skip_newlines(token(TokenKind::RightBrace, None)),
                Some(take_first()),
            ),
            Some(take_second()),
        );

        let p_atom = choice(vec![
            token(TokenKind::Identifier, Some(n_identifier)),
            token(TokenKind::True, Some(n_true)),
            token(TokenKind::False, Some(n_false)),
            token(TokenKind::Null, Some(n_null)),
            token(TokenKind::Fail, Some(n_fail)),
            token(TokenKind::Success, Some(n_success)),
            token(TokenKind::Str, Some(n_string)),
            token(TokenKind::Int, Some(n_int)),
            token(TokenKind::Float, Some(n_float)),
            token(TokenKind::Underscore, Some(n_underscore)),
            token(TokenKind::Index, Some(n_index)),
            p_list,
            p_object,
            p_set,
            p_group.clone(),
        ]);

        // Call arguments
        let p_arg = nest_node(expr.clone(), NodeKind::Arg);
        let p_args = then(
            comma_separated(p_arg, n_linked(), n_rhs()),
            token(TokenKind::RightParen, None),
            Some(take_first()),
        );
        let p_call_rhs = nest_right(
            then(
                token(TokenKind::LeftParen, None),
                choice(vec![
                    nest_node(token(TokenKind::RightParen, None), NodeKind::Arg),
                    p_args,
                ]),
                Some(take_second()),
            ),
            NodeKind::Call,
        );

        // Slices and accessors
        let p_slice = choice(vec![
            then(
                unary_pre.clone(),
                then_maybe(
                    token(TokenKind::DotDot, None),
                    unary_pre.clone(),
                    Some(take_second()),
                ),
                Some(n_slice()),
            ),
            then_maybe(
                token(TokenKind::DotDot, Some(n_slice_atom)),
                unary_pre.clone(),
                Some(n_rhs()),
            ),
        ]);
        let p_list_slice = nest_right(
            then(
                token(TokenKind::LeftBracket, None),
                then(
                    p_slice,
                    token(TokenKind::RightBracket, None),
                    Some(take_first()),
                ),
                Some(take_second()),
            ),
            NodeKind::ListSlice,
        );
        let p_bracket_access = nest_right(
            then(
                token(TokenKind::LeftBracket, None),
                then(
                    simple_expr.clone(),
                    token(TokenKind::RightBracket, None),
                    Some(take_first()),
                ),
                Some(take_second()),
            ),
            NodeKind::BracketAccess,
        );
        let p_field_access = nest_right(
            then(
                token(TokenKind::Dot, None),
                choice(vec![
                    token(TokenKind::Identifier, Some(n_identifier)),
                    token(TokenKind::Underscore, Some(n_underscore)),
                ]),
                Some(take_second()),
            ),
            NodeKind::FieldAccess,
        );

        let p_primary_rhs = plus(
            choice(vec![
                p_call_rhs,
                p_list_slice,
                p_bracket_access.clone(),
                p_field_access.clone(),
            ]),
            n_left_assoc(),
        );
        let p_primary = then_maybe(p_atom, p_primary_rhs, Some(n_end_left_assoc()));

        // -----------------------------------------------------------------
        // Unary expressions and power
        // -----------------------------------------------------------------

        let p_unary_post = then_maybe(
            p_primary,
            operator_unary(TokenKind::QuestionMark),
            Some(n_unary_post()),
        );
        // The right operand recurses through the whole unary level, which is
        // what makes `^` right-associative.
        let p_power_rhs = then(
            operator(TokenKind::Caret),
            unary_pre.clone(),
            Some(n_rhs()),
        );
        let p_power = then_maybe(p_unary_post, p_power_rhs, Some(n_binary()));
        let p_un_pre_op = choice(vec![
            operator_unary(TokenKind::Bang),
            operator_unary(TokenKind::Minus),
            operator_unary(TokenKind::Hash),
        ]);
        r_unary_pre.define(either(
            then(
                plus(p_un_pre_op, n_unary_nested()),
                p_power.clone(),
                Some(n_unary_nested()),
            ),
            p_power,
        ));

        // -----------------------------------------------------------------
        // Binary expressions
        // -----------------------------------------------------------------

        let p_range_rhs = then(
            operator(TokenKind::DotDot),
            unary_pre.clone(),
            Some(take_second()),
        );
        let p_range_end = then(
            operator(TokenKind::DotDot),
            unary_pre.clone(),
            Some(n_range_end()),
        );

        let p_term_op = choice(vec![
            operator(TokenKind::Star),
            operator(TokenKind::Slash),
            operator(TokenKind::Modulo),
        ]);
        let p_term_rhs = plus(
            then(p_term_op, unary_pre.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_term = choice(vec![
            p_range_end.clone(),
            then(unary_pre.clone(), p_term_rhs, Some(n_end_left_assoc())),
            then_maybe(unary_pre.clone(), p_range_rhs, Some(n_range())),
        ]);

        let p_sum_op = either(operator(TokenKind::Plus), operator(TokenKind::Minus));
        let p_sum_rhs = plus(then(p_sum_op, p_term.clone(), Some(n_rhs())), n_left_assoc());
        let p_sum = then_maybe(p_term, p_sum_rhs, Some(n_end_left_assoc()));

        let p_comparison_op = choice(vec![
            operator(TokenKind::LessEqual),
            operator(TokenKind::GreaterEqual),
            operator(TokenKind::Less),
            operator(TokenKind::Greater),
        ]);
        let p_comparison_rhs = plus(
            then(p_comparison_op, p_sum.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_comparison = then_maybe(p_sum, p_comparison_rhs, Some(n_end_left_assoc()));

        let p_equality_op = either(
            operator(TokenKind::EqualEqual),
            operator(TokenKind::BangEqual),
        );
        let p_equality_rhs = plus(
            then(p_equality_op, p_comparison.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_equality = then_maybe(p_comparison, p_equality_rhs, Some(n_end_left_assoc()));

        // -----------------------------------------------------------------
        // Logical expressions
        // -----------------------------------------------------------------

        let p_in_rhs = plus(
            then(operator(TokenKind::In), p_equality.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_in_expr = then_maybe(p_equality, p_in_rhs, Some(n_end_left_assoc()));

        let p_conjunction_rhs = plus(
            then(operator(TokenKind::And), p_in_expr.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_conjunction = then_maybe(p_in_expr, p_conjunction_rhs, Some(n_end_left_assoc()));

        let p_disjunction_rhs = plus(
            then(operator(TokenKind::Or), p_conjunction.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_disjunction = then_maybe(p_conjunction, p_disjunction_rhs, Some(n_end_left_assoc()));

        let p_fallback_rhs = plus(
            then(operator(TokenKind::Bar), p_disjunction.clone(), Some(n_rhs())),
            n_left_assoc(),
        );
        let p_fallback = then_maybe(p_disjunction, p_fallback_rhs, Some(n_end_left_assoc()));

        // -----------------------------------------------------------------
        // Conditional expressions (postfix if/unless)
        // -----------------------------------------------------------------

        let p_else_rhs = then(
            token(TokenKind::Else, None),
            cond_else_expr.clone(),
            Some(take_second()),
        );
        let p_if_rhs = then(
            operator(TokenKind::If),
            p_fallback.clone(),
            Some(n_lhs()),
        );
        let p_unless_rhs = then(
            operator(TokenKind::Unless),
            p_fallback.clone(),
            Some(invert_second(n_lhs())),
        );
        // A trailing ':' or '{' means this is really a conditional statement;
        // the postfix form backs off and lets the statement grammar have it.
        let p_cond_rhs = then_not(
            choice(vec![p_if_rhs, p_unless_rhs]),
            choice(vec![
                token(TokenKind::Colon, None),
                token(TokenKind::LeftBrace, None),
            ]),
        );
        let p_cond_expr = then_maybe(p_fallback, p_cond_rhs, Some(n_binary_flip()));
        r_cond_else_expr.define(then_maybe(p_cond_expr, p_else_rhs, Some(n_else())));

        // -----------------------------------------------------------------
        // Lambdas and destructuring patterns
        // -----------------------------------------------------------------

        let p_list_destruc = in_brackets(then_maybe(
            listify(token(TokenKind::Identifier, Some(n_identifier))),
            plus(
                then(
                    token(TokenKind::Comma, None),
                    token(TokenKind::Identifier, Some(n_identifier)),
                    Some(take_second()),
                ),
                n_list_tail(),
            ),
            Some(n_list_head()),
        ));
        let p_obj_pair_destruc = then_maybe(
            token(TokenKind::Identifier, Some(n_identifier)),
            then(
                token(TokenKind::Colon, None),
                token(TokenKind::Identifier, Some(n_identifier)),
                Some(take_second()),
            ),
            Some(n_kv_pair()),
        );
        let p_obj_destruc = in_braces(comma_separated(
            skip_newlines(nest_node(p_obj_pair_destruc, NodeKind::ObjectItem)),
            n_linked(),
            n_rhs(),
        ));

        let p_param = choice(vec![
            token(TokenKind::Identifier, Some(n_param)),
            nest_node(p_list_destruc.clone(), NodeKind::Param),
            nest_node(p_obj_destruc.clone(), NodeKind::Param),
        ]);
        let p_params = comma_separated(p_param, n_linked(), n_rhs());
        let p_paren_params = in_parens(p_params);
        let p_empty_params = then(
            token(TokenKind::LeftParen, None),
            token(TokenKind::RightParen, None),
            Some(n_empty_params()),
        );
        let p_single_param = token(TokenKind::Identifier, Some(n_param));

        let p_lambda_rhs = then(
            operator(TokenKind::Arrow),
            skip_newlines(choice(vec![
                expr.clone(),
                skip_newlines(in_braces(stmts.clone())),
            ])),
            Some(n_rhs()),
        );
        let p_lambda = then(
            choice(vec![p_single_param, p_empty_params, p_paren_params]),
            p_lambda_rhs,
            Some(n_binary()),
        );

        r_simple_expr.define(choice(vec![p_lambda.clone(), cond_else_expr.clone()]));

        // -----------------------------------------------------------------
        // Compound expressions (pipelines)
        // -----------------------------------------------------------------

        let p_compound_arg = choice(vec![
            p_lambda.clone(),
            implicit_lambda(cond_else_expr.clone()),
        ]);
        let p_pipe_rhs = then(
            operator(TokenKind::Pipe),
            p_compound_arg.clone(),
            Some(n_rhs()),
        );
        let p_where_rhs = then(
            operator(TokenKind::Where),
            p_compound_arg.clone(),
            Some(n_rhs()),
        );
        let p_map_rhs = then(
            operator(TokenKind::Map),
            p_compound_arg.clone(),
            Some(n_rhs()),
        );
        let p_find_rhs = then(
            operator(TokenKind::Find),
            p_compound_arg,
            Some(n_rhs()),
        );
        // fold takes a two-parameter lambda, so the underscore rewrite
        // (which always synthesizes one parameter) does not apply.
        let p_fold_rhs = then(
            operator(TokenKind::Fold),
            choice(vec![p_lambda, cond_else_expr.clone()]),
            Some(n_rhs()),
        );
        let p_compound_rhs = plus(
            skip_newlines(choice(vec![
                p_pipe_rhs,
                p_where_rhs,
                p_map_rhs,
                p_find_rhs,
                p_fold_rhs,
            ])),
            n_left_assoc(),
        );
        let p_compound_expr = then_maybe(
            simple_expr.clone(),
            p_compound_rhs,
            Some(n_end_left_assoc()),
        );

        r_expr.define(p_compound_expr);

        // -----------------------------------------------------------------
        // Assignment and declaration
        // -----------------------------------------------------------------

        let p_assign_op = choice(vec![
            assign_operator(TokenKind::Equal),
            assign_operator(TokenKind::PlusEqual),
            assign_operator(TokenKind::MinusEqual),
            assign_operator(TokenKind::StarEqual),
            assign_operator(TokenKind::SlashEqual),
            assign_operator(TokenKind::ModuloEqual),
            assign_operator(TokenKind::BarEqual),
        ]);
        let p_assign_rhs = then(
            p_assign_op,
            skip_newlines(expr.clone()),
            Some(n_assignment_rhs()),
        );
        let p_assign_target = then_maybe(
            token(TokenKind::Identifier, Some(n_identifier)),
            plus(
                choice(vec![p_bracket_access, p_field_access]),
                n_left_assoc(),
            ),
            Some(n_end_left_assoc()),
        );
        let p_assignment = then(p_assign_target, p_assign_rhs, Some(n_assignment()));

        let p_decl_target = choice(vec![
            p_list_destruc,
            token(TokenKind::Identifier, Some(n_identifier)),
            p_obj_destruc,
        ]);
        let p_decl_rhs = then(
            either(
                operator(TokenKind::ColonEqual),
                operator(TokenKind::LeftArrow),
            ),
            implicit_lambda(skip_newlines(expr.clone())),
            Some(n_rhs()),
        );
        let p_const_decl = then(p_decl_target.clone(), p_decl_rhs.clone(), Some(n_binary()));
        let p_var_decl = then(
            then(
                token(TokenKind::Var, None),
                p_decl_target.clone(),
                Some(take_second()),
            ),
            alter_kind(p_decl_rhs, NodeKind::VarDecl),
            Some(n_binary()),
        );
        let p_decl = choice(vec![p_var_decl, p_const_decl]);

        let p_return_stmt = nest_right(
            then(token(TokenKind::Return, None), expr.clone(), Some(take_second())),
            NodeKind::Return,
        );
        let p_import_stmt = then_maybe(
            then(
                token(TokenKind::Import, None),
                token(TokenKind::Str, Some(n_string)),
                Some(n_import()),
            ),
            then(
                token(TokenKind::As, None),
                token(TokenKind::Identifier, Some(n_identifier)),
                Some(take_second()),
            ),
            Some(n_rhs()),
        );

        let p_simple_stmt = choice(vec![
            p_return_stmt,
            operator(TokenKind::Break),
            operator(TokenKind::Continue),
            p_decl,
            p_assignment,
        ]);

        // -----------------------------------------------------------------
        // Compound statements
        // -----------------------------------------------------------------

        let p_stmt_body = choice(vec![
            then(
                token(TokenKind::Colon, None),
                skip_newlines(stmt.clone()),
                Some(take_second()),
            ),
            skip_newlines(in_braces(stmts.clone())),
        ]);

        let p_else_stmt = then(
            token(TokenKind::Else, None),
            choice(vec![cond_stmt.clone(), p_stmt_body.clone()]),
            Some(take_second()),
        );
        let p_if_stmt = then(
            then(operator(TokenKind::If), expr.clone(), Some(n_lhs())),
            p_stmt_body.clone(),
            Some(n_rhs()),
        );
        let p_unless_stmt = then(
            then(
                operator(TokenKind::Unless),
                expr.clone(),
                Some(invert_second(n_lhs())),
            ),
            p_stmt_body.clone(),
            Some(n_rhs()),
        );
        r_cond_stmt.define(then(
            choice(vec![p_if_stmt, p_unless_stmt]),
            maybe(p_else_stmt),
            Some(n_else()),
        ));

        let p_while_stmt = then(
            then(operator(TokenKind::While), expr.clone(), Some(n_lhs())),
            p_stmt_body.clone(),
            Some(n_rhs()),
        );
        let p_until_stmt = then(
            then(
                operator(TokenKind::Until),
                expr.clone(),
                Some(invert_second(n_lhs())),
            ),
            p_stmt_body.clone(),
            Some(n_rhs()),
        );
        let p_for_assign = then(
            p_decl_target,
            then(operator(TokenKind::LeftArrow), expr.clone(), Some(n_rhs())),
            Some(n_binary()),
        );
        let p_for_stmt = then(
            then(operator(TokenKind::For), p_for_assign, Some(n_lhs())),
            p_stmt_body,
            Some(n_rhs()),
        );
        let p_loop_stmt = choice(vec![p_while_stmt, p_until_stmt, p_for_stmt]);

        let p_compound_stmt = choice(vec![cond_stmt, p_loop_stmt]);

        // -----------------------------------------------------------------
        // Statements and program
        // -----------------------------------------------------------------

        let p_terminator = choice(vec![
            token(TokenKind::NewLine, None),
            token(TokenKind::Semicolon, None),
            peek(token(TokenKind::RightBrace, None)),
        ]);
        r_stmt.define(nest_node(
            then_maybe(
                choice(vec![p_import_stmt, p_compound_stmt, p_simple_stmt, expr]),
                p_terminator,
                Some(take_first()),
            ),
            NodeKind::Stmt,
        ));
        r_stmts.define(plus(skip_newlines(stmt), n_linked()));

        let program = then(
            stmts.clone(),
            skip_newlines(token(TokenKind::Eof, None)),
            Some(take_first()),
        );

        Grammar {
            program,
            stmts,
        }
    }
}
