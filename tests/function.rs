#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        print_function in function is OK
        "<fn foo>"
    }

    tests! {
        print_native in function is OK
        "<native fn>"
    }

    tests! {
        call_with_arguments in function is OK
        "3"
        "foobar"
    }

    tests! {
        recursion in function is OK
        "55"
    }

    tests! {
        nil_return in function is OK
        "nil"
    }

    tests! {
        early_return in function is OK
        "positive"
        "negative"
    }

    tests! {
        arity_mismatch in function is ERR
        "Expected 2 arguments but got 1."
        "[line 4]"
    }

    tests! {
        call_string in function is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        call_nil in function is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        too_many_arguments in function is ERR
        "[line 2] Error at '255': Can't have more than 255 arguments."
    }

    tests! {
        too_many_parameters in function is ERR
        "[line 1] Error at 'p255': Can't have more than 255 parameters."
    }
}
