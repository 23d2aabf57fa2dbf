fn main() {
    explain_uf::cli()
}
