//! Query translation from roster filter expressions to MongoDB query syntax.

use bson::{Document, Bson, doc};

use roster_core::{
    query::{QueryVisitor, Expr, FieldOp},
    error::DocumentStoreError,
};


/// Translates filter expressions into MongoDB query documents.
///
/// Dotted field paths are passed through unchanged; MongoDB resolves them into
/// embedded documents itself.
pub(crate) struct MongoQueryTranslator;

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        // `$and` rejects an empty array; an empty conjunction matches everything.
        if exprs.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }
}

/// Builds the exclusion projection for a query, if it excludes anything.
pub(crate) fn exclusion_projection(exclude: &[String]) -> Option<Document> {
    if exclude.is_empty() {
        return None;
    }

    Some(exclude.iter().map(|field| (field.clone(), Bson::Int32(0))).collect())
}
