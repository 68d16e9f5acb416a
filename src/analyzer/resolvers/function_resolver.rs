use crate::analyzer::{
    did_you_mean, suggest_within, AnalysisContext, CallSyntax, Failure, FunctionCall, Resolution, TypeChecker,
};

pub struct FunctionResolver;

impl FunctionResolver {
    /// Bind a call whose arguments are already resolved.
    pub fn resolve(mut call: FunctionCall, ctx: &AnalysisContext) -> FunctionCall {
        call.resolution = Self::resolution(&call, ctx);
        call
    }

    fn resolution(call: &FunctionCall, ctx: &AnalysisContext) -> Resolution {
        let config = ctx.config;
        let failed = |message: String| Resolution::Failed { def: None, failure: Failure::new(message, call.location) };

        let Some(def) = ctx.registry.get(&call.name) else {
            return match call.syntax {
                CallSyntax::Extract => {
                    let suggestions = suggest_within(
                        &call.name,
                        ctx.registry.datetime_names(),
                        config.max_column_suggestions,
                        config.similarity_threshold,
                    );
                    failed(format!("Unknown datetime field [{}]{}", call.name, did_you_mean(&suggestions)))
                }
                _ => {
                    let suggestions = suggest_within(
                        &call.name,
                        ctx.registry.names(),
                        config.max_function_suggestions,
                        config.similarity_threshold,
                    );
                    failed(format!("Unknown function [{}]{}", call.name, did_you_mean(&suggestions)))
                }
            };
        };

        if call.syntax == CallSyntax::Extract && !def.datetime_extract {
            return failed(format!("Invalid datetime field [{}]. Use any datetime function.", call.name));
        }

        if !def.arity.accepts(call.args.len()) {
            let message = format!(
                "Function [{}] expects {} argument(s), found [{}]",
                def.name,
                def.arity.describe(),
                call.args.len()
            );
            return Resolution::Failed { def: Some(def), failure: Failure::new(message, call.location) };
        }

        match TypeChecker::check(call, &def) {
            Some(failure) => Resolution::Failed { def: Some(def), failure },
            None => Resolution::Bound(def),
        }
    }
}
